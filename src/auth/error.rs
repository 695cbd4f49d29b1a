use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username and password are required")]
    CredentialsRequired,

    #[error("All fields are required")]
    FieldsRequired,

    #[error("Auth provider error: {0}")]
    Provider(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
