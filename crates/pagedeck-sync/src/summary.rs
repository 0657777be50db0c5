/// Counters accumulated over one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub pages_processed: usize,
    pub pages_skipped: usize,
    pub posts_processed: usize,
    pub comments_processed: usize,
    pub conversations_processed: usize,
    pub messages_processed: usize,
    pub placeholder_authors: usize,
    pub missing_permissions: Vec<String>,
    pub granted_permissions: Vec<String>,
}

impl SyncSummary {
    /// One-line result for the dashboard.
    pub fn describe(&self) -> String {
        format!(
            "Synced {} pages, {} posts, {} comments and {} messages.",
            self.pages_processed,
            self.posts_processed,
            self.comments_processed,
            self.messages_processed
        )
    }

    /// Conditions worth surfacing even though the run succeeded.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.missing_permissions.is_empty() {
            warnings.push(format!(
                "Missing permissions: {}. Some data may be incomplete.",
                self.missing_permissions.join(", ")
            ));
        }
        if self.pages_skipped > 0 {
            warnings.push(format!(
                "Skipped {} page(s): no page token or page details available.",
                self.pages_skipped
            ));
        }
        if self.placeholder_authors > 0 {
            warnings.push(format!(
                "{} comment author(s) were withheld by the API and stored under placeholder names.",
                self.placeholder_authors
            ));
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_run_has_no_warnings() {
        let summary = SyncSummary {
            pages_processed: 2,
            posts_processed: 10,
            comments_processed: 4,
            messages_processed: 1,
            ..Default::default()
        };
        assert_eq!(
            summary.describe(),
            "Synced 2 pages, 10 posts, 4 comments and 1 messages."
        );
        assert!(summary.warnings().is_empty());
    }

    #[test]
    fn warnings_name_missing_permissions() {
        let summary = SyncSummary {
            missing_permissions: vec!["pages_messaging".into(), "pages_read_user_content".into()],
            pages_skipped: 1,
            ..Default::default()
        };
        let warnings = summary.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("pages_messaging, pages_read_user_content"));
    }
}
