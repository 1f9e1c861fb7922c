use order_engine::OrderStoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostgrestApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The server returned no rows")]
    EmptyResponse,
}

impl From<PostgrestApiError> for OrderStoreError {
    fn from(e: PostgrestApiError) -> Self {
        match e {
            PostgrestApiError::QueryError { status, message } => OrderStoreError::RemoteError { status, message },
            PostgrestApiError::Initialization(s) | PostgrestApiError::RestResponseError(s) => {
                OrderStoreError::ConnectionError(s)
            },
            PostgrestApiError::JsonError(s) => OrderStoreError::InvalidData(s),
            e @ PostgrestApiError::EmptyResponse => OrderStoreError::InvalidData(e.to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn query_errors_keep_status_and_message() {
        let e = PostgrestApiError::QueryError { status: 409, message: "duplicate key".into() };
        match OrderStoreError::from(e) {
            OrderStoreError::RemoteError { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "duplicate key");
            },
            other => panic!("Unexpected error: {other:?}"),
        }
    }
}
