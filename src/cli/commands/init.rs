use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database;

/// Schema statements, ordered so foreign keys resolve. Idempotent: every
/// statement is IF NOT EXISTS.
const SCHEMA: [&str; 9] = [
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL CHECK (role IN ('admin', 'instructor', 'student')),
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        phone TEXT,
        address TEXT,
        date_of_birth DATE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS instructors (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        license_number TEXT NOT NULL,
        hire_date DATE NOT NULL,
        specializations TEXT,
        status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'inactive')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS students (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        license_type TEXT NOT NULL CHECK (license_type IN ('A', 'B', 'C', 'D', 'E')),
        registration_date DATE NOT NULL,
        status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'inactive', 'completed')),
        medical_certificate_expiry DATE,
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS vehicles (
        id UUID PRIMARY KEY,
        vehicle_number TEXT NOT NULL UNIQUE,
        make TEXT NOT NULL,
        model TEXT NOT NULL,
        year INT NOT NULL,
        vehicle_type TEXT NOT NULL CHECK (vehicle_type IN ('car', 'motorcycle', 'truck', 'bus')),
        license_type_required TEXT NOT NULL CHECK (license_type_required IN ('A', 'B', 'C', 'D', 'E')),
        registration_expiry DATE NOT NULL,
        insurance_expiry DATE NOT NULL,
        inspection_expiry DATE NOT NULL,
        status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'maintenance', 'inactive')),
        maintenance_notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS courses (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        license_type TEXT NOT NULL CHECK (license_type IN ('A', 'B', 'C', 'D', 'E')),
        theory_hours INT NOT NULL,
        practical_hours INT NOT NULL,
        price NUMERIC(10, 2) NOT NULL,
        status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'inactive')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS enrollments (
        id UUID PRIMARY KEY,
        student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        enrollment_date DATE NOT NULL,
        completion_date DATE,
        status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'completed', 'cancelled')),
        theory_progress INT NOT NULL DEFAULT 0,
        practical_progress INT NOT NULL DEFAULT 0,
        total_paid NUMERIC(10, 2) NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS lessons (
        id UUID PRIMARY KEY,
        enrollment_id UUID NOT NULL REFERENCES enrollments(id) ON DELETE CASCADE,
        instructor_id UUID NOT NULL REFERENCES instructors(id) ON DELETE CASCADE,
        vehicle_id UUID REFERENCES vehicles(id) ON DELETE SET NULL,
        lesson_type TEXT NOT NULL CHECK (lesson_type IN ('theory', 'practical')),
        start_time TIMESTAMPTZ NOT NULL,
        end_time TIMESTAMPTZ NOT NULL,
        duration INT NOT NULL,
        status TEXT NOT NULL DEFAULT 'scheduled' CHECK (status IN ('scheduled', 'completed', 'cancelled', 'no_show')),
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS payments (
        id UUID PRIMARY KEY,
        enrollment_id UUID NOT NULL REFERENCES enrollments(id) ON DELETE CASCADE,
        amount NUMERIC(10, 2) NOT NULL,
        payment_date DATE NOT NULL,
        payment_method TEXT NOT NULL CHECK (payment_method IN ('cash', 'credit_card', 'bank_transfer', 'other')),
        reference_number TEXT,
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS exams (
        id UUID PRIMARY KEY,
        student_id UUID NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        exam_type TEXT NOT NULL CHECK (exam_type IN ('theory', 'practical')),
        license_type TEXT NOT NULL CHECK (license_type IN ('A', 'B', 'C', 'D', 'E')),
        exam_date DATE NOT NULL,
        result TEXT NOT NULL DEFAULT 'pending' CHECK (result IN ('pass', 'fail', 'pending')),
        score INT,
        notes TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
];

pub async fn handle(skip_seed: bool) -> anyhow::Result<()> {
    let db_name = database::database_name()?;

    // CREATE DATABASE must run from the maintenance database
    let admin_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database::admin_url()?)
        .await
        .context("failed to connect to the maintenance database")?;
    database::create_database(&admin_pool, &db_name).await?;
    admin_pool.close().await;

    let pool = PgPoolOptions::new()
        .connect(&std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?)
        .await
        .with_context(|| format!("failed to connect to database '{}'", db_name))?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }
    println!("Schema created or already exists in '{}'", db_name);

    if !skip_seed {
        seed(&pool).await?;
    }

    pool.close().await;
    println!("Database setup completed successfully");
    Ok(())
}

/// Sample courses and vehicles so a fresh install has something to show.
async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let course_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
        .fetch_one(pool)
        .await?;

    if course_count == 0 {
        let courses: [(&str, &str, &str, i32, i32, Decimal); 3] = [
            (
                "Class B License - Standard",
                "Standard course for passenger car license",
                "B",
                20,
                15,
                Decimal::new(120000, 2),
            ),
            (
                "Class A License - Motorcycle",
                "Course for motorcycle license",
                "A",
                15,
                10,
                Decimal::new(90000, 2),
            ),
            (
                "Class C License - Commercial",
                "Course for commercial vehicle license",
                "C",
                30,
                25,
                Decimal::new(200000, 2),
            ),
        ];

        for (name, description, license_type, theory, practical, price) in courses {
            sqlx::query(
                "INSERT INTO courses
                 (id, name, description, license_type, theory_hours, practical_hours, price)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(description)
            .bind(license_type)
            .bind(theory)
            .bind(practical)
            .bind(price)
            .execute(pool)
            .await?;
        }
        println!("Seeded sample courses");
    }

    let vehicles: [(&str, &str, &str, i32, &str, &str); 3] = [
        ("DS001", "Toyota", "Corolla", 2021, "car", "B"),
        ("DS002", "Honda", "CBR500", 2022, "motorcycle", "A"),
        ("DS003", "Mercedes", "Actros", 2020, "truck", "C"),
    ];

    for (number, make, model, year, vehicle_type, license_type) in vehicles {
        sqlx::query(
            "INSERT INTO vehicles
             (id, vehicle_number, make, model, year, vehicle_type, license_type_required,
              registration_expiry, insurance_expiry, inspection_expiry)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     CURRENT_DATE + interval '1 year',
                     CURRENT_DATE + interval '6 months',
                     CURRENT_DATE + interval '3 months')
             ON CONFLICT (vehicle_number) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(number)
        .bind(make)
        .bind(model)
        .bind(year)
        .bind(vehicle_type)
        .bind(license_type)
        .execute(pool)
        .await?;
    }
    println!("Seeded sample vehicles");

    Ok(())
}
