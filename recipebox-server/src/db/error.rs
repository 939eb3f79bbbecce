/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Provisioning failed at a named step
    #[error("provisioning failed while trying to {step}: {source}")]
    Provision {
        step: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    pub(crate) fn provision(step: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Provision { step, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provision_error_names_step() {
        let err = StoreError::provision("create table")(sqlx::Error::PoolClosed);
        assert!(err.to_string().contains("create table"));
    }
}
