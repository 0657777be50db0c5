use serde_json::Value;
use tracing::warn;

use pagedeck_types::api::{PermissionReport, PermissionStatus};
use pagedeck_types::graph::{PermissionEntry, parse_listing};

use crate::GraphApi;

/// Permissions a full sync needs, with what each one unlocks.
pub const REQUIRED_PERMISSIONS: &[(&str, &str)] = &[
    ("pages_show_list", "List the pages you manage"),
    ("pages_read_engagement", "Read posts, followers and engagement counts"),
    ("pages_read_user_content", "Read comments and their authors"),
    ("pages_manage_metadata", "Read page settings and details"),
    ("pages_messaging", "Read page conversations and messages"),
];

pub async fn permission_report(api: &dyn GraphApi) -> PermissionReport {
    let body = api.permissions().await;
    if body.is_none() {
        warn!("Permission introspection failed; reporting all permissions as missing");
    }
    classify(body.as_ref())
}

/// Split [`REQUIRED_PERMISSIONS`] by the statuses in a `me/permissions` body.
pub fn classify(body: Option<&Value>) -> PermissionReport {
    let granted: Vec<String> = body
        .and_then(parse_listing::<PermissionEntry>)
        .map(|listing| {
            listing
                .items
                .into_iter()
                .filter(|entry| entry.status == "granted")
                .map(|entry| entry.permission)
                .collect()
        })
        .unwrap_or_default();

    let mut report = PermissionReport::default();
    for (permission, description) in REQUIRED_PERMISSIONS {
        let status = PermissionStatus {
            permission: permission.to_string(),
            description: description.to_string(),
        };
        if granted.iter().any(|g| g == permission) {
            report.granted.push(status);
        } else {
            report.missing.push(status);
        }
    }
    report
}
