pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod exams;
pub mod instructors;
pub mod lessons;
pub mod payments;
pub mod reports;
pub mod schedule;
pub mod students;
pub mod users;
pub mod vehicles;
