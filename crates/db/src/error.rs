use thiserror::Error;

use tomato_kernel::settings::MONGODB_URI_ENV;

/// Ways the database bootstrap can fail.
#[derive(Error, Debug)]
pub enum DbError {
    /// No connection string was configured.
    #[error("Please define the {var} environment variable")]
    MissingUri { var: &'static str },

    /// The driver could not parse the string, reach the server, or authenticate.
    #[error("{source}")]
    Connection {
        #[source]
        source: mongodb::error::Error,
    },
}

impl DbError {
    pub(crate) fn missing_uri() -> Self {
        Self::MissingUri {
            var: MONGODB_URI_ENV,
        }
    }

    /// Process exit status a binary should use for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            DbError::MissingUri { .. } | DbError::Connection { .. } => 1,
        }
    }
}

impl From<mongodb::error::Error> for DbError {
    fn from(source: mongodb::error::Error) -> Self {
        Self::Connection { source }
    }
}
