use mongodb::bson::{doc, Document};

use super::models::{AppliedJob, Job};

/// Category value that means "no category filter".
pub const ALL_JOBS: &str = "All Jobs";

fn category_filter(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != ALL_JOBS)
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFilter {
    All,
    Category(String),
    TitleContains(String),
    Creator(String),
}

impl JobFilter {
    pub fn by_category(category: Option<&str>) -> Self {
        category_filter(category).map_or(JobFilter::All, JobFilter::Category)
    }

    pub fn by_search(search: Option<&str>) -> Self {
        search
            .filter(|value| !value.is_empty())
            .map_or(JobFilter::All, |value| {
                JobFilter::TitleContains(value.to_string())
            })
    }

    pub fn by_creator(user_id: &str) -> Self {
        JobFilter::Creator(user_id.to_string())
    }

    pub fn to_document(&self) -> Document {
        match self {
            JobFilter::All => doc! {},
            JobFilter::Category(category) => doc! { "category": category.as_str() },
            JobFilter::TitleContains(search) => doc! {
                "jobTitle": { "$regex": regex::escape(search), "$options": "i" }
            },
            JobFilter::Creator(user_id) => doc! { "userId": user_id.as_str() },
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        match self {
            JobFilter::All => true,
            JobFilter::Category(category) => job.category() == Some(category.as_str()),
            JobFilter::TitleContains(search) => job
                .job_title()
                .is_some_and(|title| title.to_lowercase().contains(&search.to_lowercase())),
            JobFilter::Creator(user_id) => job.user_id() == Some(user_id.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedJobFilter {
    pub email: String,
    pub category: Option<String>,
}

impl AppliedJobFilter {
    pub fn new(email: &str, category: Option<&str>) -> Self {
        Self {
            email: email.to_string(),
            category: category_filter(category),
        }
    }

    pub fn to_document(&self) -> Document {
        let mut filter = doc! { "email": self.email.as_str() };
        if let Some(category) = &self.category {
            filter.insert("category", category.as_str());
        }
        filter
    }

    pub fn matches(&self, applied: &AppliedJob) -> bool {
        applied.email() == Some(self.email.as_str())
            && self
                .category
                .as_deref()
                .map_or(true, |category| applied.category() == Some(category))
    }
}
