use std::sync::Arc;

use crm_infra::db::PgPool;
use crm_infra::{CustomerStore, PostgresCustomerStore};

/// Backends shared by all handlers.
#[derive(Clone)]
pub struct AppServices {
    pub customers: Arc<dyn CustomerStore>,
}

impl AppServices {
    pub fn new(customers: Arc<dyn CustomerStore>) -> Self {
        Self { customers }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Arc::new(PostgresCustomerStore::new(pool)))
    }
}
