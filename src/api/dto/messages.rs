use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub email: Option<String>,
}
