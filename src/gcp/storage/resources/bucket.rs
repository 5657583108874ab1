use super::object::Projection;
use super::{from_string_option, percent_encode, BASE_URL};

/// See [GCS buckets list API reference](https://cloud.google.com/storage/docs/json_api/v1/buckets/list)
#[derive(Debug, PartialEq, Eq, serde::Serialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BucketsListRequest {
    /// [Partial Response](https://cloud.google.com/storage/docs/json_api#partial-response)
    pub fields: Option<String>,
    pub max_results: Option<usize>,
    pub page_token: Option<String>,
    pub prefix: Option<String>,
    pub projection: Option<Projection>,
}

/// One buckets.list page.
#[derive(Debug, serde::Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Buckets {
    pub kind: Option<String>,

    #[serde(default = "Vec::new")]
    pub items: Vec<Bucket>,

    pub next_page_token: Option<String>,
}

#[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub location: Option<String>,
    pub storage_class: Option<String>,
    pub time_created: Option<chrono::DateTime<chrono::Utc>>,
    pub updated: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, deserialize_with = "from_string_option")]
    pub project_number: Option<u64>,
    pub etag: Option<String>,
}

/// buckets.insert request body, the name is the only required field.
#[derive(Debug, PartialEq, Eq, serde::Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewBucket {
    pub name: String,
}

impl NewBucket {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }
}

pub(crate) fn bucket_url(name: &str) -> String {
    format!("{}/b/{}", BASE_URL, percent_encode(name))
}

pub(crate) fn buckets_url(project: &str) -> String {
    format!("{}/b?project={}", BASE_URL, percent_encode(project))
}
