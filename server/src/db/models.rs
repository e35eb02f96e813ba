use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{JobBoardError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Document,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            extra: Document::new(),
        }
    }
}

/// Counter bumped once per application.
pub const APPLICANTS_FIELD: &str = "NumberOfApplicants";

/// Fields `PUT /job/{id}` is allowed to replace.
pub const REPLACEABLE_JOB_FIELDS: [&str; 7] = [
    "jobTitle",
    "category",
    "salaryRange",
    "companyLogo",
    "jobDetails",
    "applicationDeadline",
    "jobBanner",
];

fn numeric(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        Bson::Double(n) => Some(*n as i64),
        _ => None,
    }
}

/// A job posting, kept as the document the client sent. Only the fields the
/// board filters or counts on are read back out, and any of them may be
/// absent or of an unexpected type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Job {
    document: Document,
}

impl Job {
    pub fn new(job_title: impl Into<String>, category: impl Into<String>) -> Self {
        let job_title: String = job_title.into();
        let category: String = category.into();
        Self::from_document(doc! { "jobTitle": job_title, "category": category })
    }

    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    pub fn with(mut self, key: &str, value: impl Into<Bson>) -> Self {
        self.document.insert(key, value);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn get(&self, key: &str) -> Option<&Bson> {
        self.document.get(key)
    }

    pub fn id(&self) -> Option<ObjectId> {
        self.document.get_object_id("_id").ok()
    }

    pub fn set_id(&mut self, id: ObjectId) {
        self.document.insert("_id", id);
    }

    pub fn job_title(&self) -> Option<&str> {
        self.document.get_str("jobTitle").ok()
    }

    pub fn category(&self) -> Option<&str> {
        self.document.get_str("category").ok()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.document.get_str("userId").ok()
    }

    /// The applicant counter when it holds a number.
    pub fn number_of_applicants(&self) -> Option<i64> {
        self.document.get(APPLICANTS_FIELD).and_then(numeric)
    }

    /// Strips any client-supplied identifier so the store assigns a fresh one,
    /// and starts the applicant counter at zero when the client sent none.
    pub fn into_new_record(mut self) -> Self {
        self.document.remove("_id");
        if !self.document.contains_key(APPLICANTS_FIELD) {
            self.document.insert(APPLICANTS_FIELD, 0_i64);
        }
        self
    }

    /// Overwrites the fields present in `fields`, leaving everything else untouched.
    /// Returns whether any value changed.
    pub fn apply(&mut self, fields: &JobFields) -> bool {
        let mut changed = false;
        for (key, value) in fields.document() {
            if self.document.get(key) != Some(value) {
                self.document.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }

    /// Adds one to the applicant counter with `$inc` semantics: a missing
    /// counter becomes 1, the numeric type is kept, and non-numbers are refused.
    pub fn increment_applicants(&mut self) -> Result<()> {
        let next = match self.document.get(APPLICANTS_FIELD) {
            None => Bson::Int32(1),
            Some(Bson::Int32(n)) => n
                .checked_add(1)
                .map_or(Bson::Int64(i64::from(*n) + 1), Bson::Int32),
            Some(Bson::Int64(n)) => Bson::Int64(n.checked_add(1).ok_or_else(|| {
                JobBoardError::Store(format!("{} overflow", APPLICANTS_FIELD))
            })?),
            Some(Bson::Double(n)) => Bson::Double(n + 1.0),
            Some(other) => {
                return Err(JobBoardError::Store(format!(
                    "cannot increment non-numeric {}: {}",
                    APPLICANTS_FIELD, other
                )))
            }
        };
        self.document.insert(APPLICANTS_FIELD, next);
        Ok(())
    }
}

/// The replaceable subset of a job, as sent to `PUT /job/{id}`. Keys outside
/// [`REPLACEABLE_JOB_FIELDS`] are dropped; values pass through untyped.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct JobFields {
    document: Document,
}

impl<'de> Deserialize<'de> for JobFields {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Document::deserialize(deserializer).map(Self::from_document)
    }
}

impl JobFields {
    pub fn from_document(document: Document) -> Self {
        Self {
            document: document
                .into_iter()
                .filter(|(key, _)| REPLACEABLE_JOB_FIELDS.contains(&key.as_str()))
                .collect(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    pub fn to_set_document(&self) -> Document {
        self.document.clone()
    }
}

/// An application record. Embedded job fields and timestamps travel untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AppliedJob {
    document: Document,
}

impl AppliedJob {
    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn id(&self) -> Option<ObjectId> {
        self.document.get_object_id("_id").ok()
    }

    pub fn set_id(&mut self, id: ObjectId) {
        self.document.insert("_id", id);
    }

    pub fn email(&self) -> Option<&str> {
        self.document.get_str("email").ok()
    }

    pub fn category(&self) -> Option<&str> {
        self.document.get_str("category").ok()
    }

    pub fn into_new_record(mut self) -> Self {
        self.document.remove("_id");
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceCollection {
    JobServices,
    Hiring,
    Clients,
}

impl ReferenceCollection {
    pub fn collection_name(self) -> &'static str {
        match self {
            ReferenceCollection::JobServices => "jobServices",
            ReferenceCollection::Hiring => "hiring",
            ReferenceCollection::Clients => "clients",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertAck {
    pub fn new(id: &ObjectId) -> Self {
        Self {
            acknowledged: true,
            inserted_id: id.to_hex(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateAck {
    pub fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_count: 0,
            upserted_id: None,
        }
    }

    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    pub fn upserted(id: &ObjectId) -> Self {
        Self {
            upserted_count: 1,
            upserted_id: Some(id.to_hex()),
            ..Self::unmatched()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAck {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

pub fn parse_object_id(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw.trim()).map_err(|_| JobBoardError::InvalidId(raw.to_string()))
}

/// Renders a stored record as plain JSON with `_id` as a hex string.
pub fn render<T: Serialize>(record: &T) -> Result<serde_json::Value> {
    Ok(render_document(bson::to_document(record)?))
}

pub fn render_all<T: Serialize>(records: &[T]) -> Result<Vec<serde_json::Value>> {
    records.iter().map(render).collect()
}

pub fn render_document(mut doc: Document) -> serde_json::Value {
    if let Some(Bson::ObjectId(id)) = doc.get("_id") {
        let hex = id.to_hex();
        doc.insert("_id", hex);
    }
    Bson::Document(doc).into_relaxed_extjson()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use serde_json::json;

    #[test]
    fn test_new_record_defaults_missing_counter_to_zero() {
        let job: Job = serde_json::from_value(json!({
            "jobTitle": "Engineer",
            "category": "Tech",
        }))
        .unwrap();
        assert_eq!(job.number_of_applicants(), None);

        let job = job.into_new_record();
        assert_eq!(job.job_title(), Some("Engineer"));
        assert_eq!(job.number_of_applicants(), Some(0));
    }

    #[test]
    fn test_job_accepts_null_and_non_string_fields() {
        let job: Job = serde_json::from_value(json!({
            "jobTitle": null,
            "companyLogo": null,
            "applicationDeadline": 1767139200000_i64,
            "NumberOfApplicants": "0",
            "postedBy": "Grace",
        }))
        .unwrap();

        assert_eq!(job.job_title(), None);
        assert_eq!(job.get("companyLogo"), Some(&Bson::Null));
        assert_eq!(job.number_of_applicants(), None);
        assert_eq!(job.document().get_str("postedBy").unwrap(), "Grace");

        let value = render(&job.into_new_record()).unwrap();
        assert_eq!(value["companyLogo"], serde_json::Value::Null);
        assert_eq!(value["applicationDeadline"], json!(1767139200000_i64));
        assert_eq!(value["NumberOfApplicants"], "0");
    }

    #[test]
    fn test_job_reads_stored_documents_of_any_shape() {
        let id = ObjectId::new();
        let stored = doc! {
            "_id": id,
            "jobTitle": 42,
            "category": Bson::Null,
            "applicationDeadline": bson::DateTime::from_millis(1_767_139_200_000),
            "NumberOfApplicants": 3.0,
        };
        let bytes = bson::to_vec(&stored).unwrap();
        let job: Job = bson::from_slice(&bytes).unwrap();

        assert_eq!(job.id(), Some(id));
        assert_eq!(job.job_title(), None);
        assert_eq!(job.category(), None);
        assert_eq!(job.number_of_applicants(), Some(3));
        assert_eq!(job.document(), &stored);
    }

    #[test]
    fn test_into_new_record_drops_client_id() {
        let job = Job::new("Engineer", "Tech").with("_id", "spoofed");

        let job = job.into_new_record();
        assert!(job.id().is_none());
        assert!(!job.document().contains_key("_id"));
    }

    #[test]
    fn test_apply_only_touches_listed_fields() {
        let mut job = Job::new("Engineer", "Tech")
            .with(APPLICANTS_FIELD, 4_i64)
            .with("userId", "creator-1");

        let fields = JobFields::from_document(doc! { "jobTitle": "Staff Engineer" });
        assert!(job.apply(&fields));
        assert_eq!(job.job_title(), Some("Staff Engineer"));
        assert_eq!(job.category(), Some("Tech"));
        assert_eq!(job.number_of_applicants(), Some(4));
        assert_eq!(job.user_id(), Some("creator-1"));
        assert!(!job.apply(&fields));

        let cleared = JobFields::from_document(doc! { "category": Bson::Null });
        assert!(job.apply(&cleared));
        assert_eq!(job.category(), None);
        assert_eq!(job.get("category"), Some(&Bson::Null));
    }

    #[test]
    fn test_job_fields_keep_only_replaceable_keys() {
        let fields: JobFields = serde_json::from_value(json!({
            "jobTitle": "Engineer",
            "salaryRange": 90000,
            "userId": "intruder",
            "NumberOfApplicants": 99,
        }))
        .unwrap();
        let set = fields.to_set_document();
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["jobTitle", "salaryRange"]);
        assert_eq!(set.get_str("jobTitle").unwrap(), "Engineer");
        assert!(!JobFields::default().to_set_document().contains_key("jobTitle"));
    }

    #[test]
    fn test_increment_follows_inc_semantics() {
        let mut job = Job::new("Engineer", "Tech");
        job.increment_applicants().unwrap();
        assert_eq!(job.get(APPLICANTS_FIELD), Some(&Bson::Int32(1)));

        let mut job = Job::new("Engineer", "Tech").with(APPLICANTS_FIELD, i32::MAX);
        job.increment_applicants().unwrap();
        assert_eq!(
            job.get(APPLICANTS_FIELD),
            Some(&Bson::Int64(i64::from(i32::MAX) + 1))
        );

        let mut job = Job::new("Engineer", "Tech").with(APPLICANTS_FIELD, 2.0);
        job.increment_applicants().unwrap();
        assert_eq!(job.get(APPLICANTS_FIELD), Some(&Bson::Double(3.0)));

        let mut job = Job::new("Engineer", "Tech").with(APPLICANTS_FIELD, "0");
        assert!(matches!(
            job.increment_applicants(),
            Err(JobBoardError::Store(_))
        ));
        assert_eq!(job.get(APPLICANTS_FIELD), Some(&Bson::String("0".to_string())));
    }

    #[test]
    fn test_applied_job_tolerates_missing_email() {
        let applied: AppliedJob = serde_json::from_value(json!({
            "userId": null,
            "category": 7,
        }))
        .unwrap();
        assert_eq!(applied.email(), None);
        assert_eq!(applied.category(), None);
    }

    #[test]
    fn test_render_uses_hex_id() {
        let id = ObjectId::new();
        let mut job = Job::new("Engineer", "Tech").into_new_record();
        job.set_id(id);

        let value = render(&job).unwrap();
        assert_eq!(value["_id"], json!(id.to_hex()));
        assert_eq!(value["jobTitle"], "Engineer");
        assert_eq!(value["NumberOfApplicants"], 0);
    }

    #[test]
    fn test_parse_object_id_rejects_garbage() {
        assert!(matches!(
            parse_object_id("not-an-id"),
            Err(JobBoardError::InvalidId(_))
        ));
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn test_update_ack_shapes() {
        let id = ObjectId::new();
        let upserted = UpdateAck::upserted(&id);
        assert_eq!(upserted.matched_count, 0);
        assert_eq!(upserted.upserted_count, 1);
        assert_eq!(upserted.upserted_id, Some(id.to_hex()));

        let value = serde_json::to_value(UpdateAck::matched(true)).unwrap();
        assert_eq!(value["matchedCount"], 1);
        assert_eq!(value["modifiedCount"], 1);
        assert_eq!(value["upsertedId"], serde_json::Value::Null);
    }
}
