/// The domain record returned by the remote collection.
///
/// `owner_id` is serialized as `userId` to stay wire-compatible with the
/// upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub body: String,
    #[serde(rename = "userId")]
    pub owner_id: i64,
}

impl Item {
    pub fn new(id: i64, title: impl Into<String>, body: impl Into<String>, owner_id: i64) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            owner_id,
        }
    }
}
