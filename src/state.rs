use sqlx::PgPool;

/// Shared handler state. The pool is constructed once at startup and injected
/// here instead of living in a global; handlers receive it via `State`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
