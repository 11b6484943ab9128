//! Property-based tests using proptest
//!
//! These tests check resource ID parsing and formatting, and the
//! normalisation and name validation applied to configuration values,
//! against randomized inputs.

use azurerm_provider::resourceid::{IdErrorKind, ResourceId};
use azurerm_provider::services::common::normalize_location;
use azurerm_provider::services::portal::dashboard_resource::normalize_json;
use azurerm_provider::services::portal::ids::DashboardId;
use azurerm_provider::services::search::ids::SearchServiceId;
use azurerm_provider::services::search::search_service_resource::validate_search_service_name;
use azurerm_provider::services::streamanalytics::ids::{FunctionId, OutputId, StreamInputId, StreamingJobId};
use azurerm_provider::services::vmware::ids::{AuthorizationId, ClusterId, PrivateCloudId};
use proptest::prelude::*;
use serde_json::json;

/// A single path segment value; never contains '/'
fn arb_segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9._()-]{0,40}"
}

fn arb_subscription() -> impl Strategy<Value = String> {
    "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
}

fn arb_private_cloud() -> impl Strategy<Value = PrivateCloudId> {
    (arb_subscription(), arb_segment(), arb_segment())
        .prop_map(|(sub, rg, name)| PrivateCloudId::new(&sub, &rg, &name))
}

fn arb_streaming_job() -> impl Strategy<Value = StreamingJobId> {
    (arb_subscription(), arb_segment(), arb_segment())
        .prop_map(|(sub, rg, name)| StreamingJobId::new(&sub, &rg, &name))
}

proptest! {
    /// Formatting then parsing yields the same ID
    #[test]
    fn private_cloud_id_round_trips(id in arb_private_cloud()) {
        prop_assert_eq!(PrivateCloudId::parse(&id.id()).unwrap(), id);
    }

    /// Child IDs keep their parent's values
    #[test]
    fn cluster_and_authorization_ids_round_trip(parent in arb_private_cloud(), name in arb_segment()) {
        let cluster = ClusterId::new(&parent, &name);
        let parsed = ClusterId::parse(&cluster.id()).unwrap();
        prop_assert_eq!(parsed.private_cloud_id(), parent.clone());
        prop_assert_eq!(&parsed, &cluster);

        let authorization = AuthorizationId::new(&parent, &name);
        prop_assert_eq!(AuthorizationId::parse(&authorization.id()).unwrap(), authorization);
    }

    #[test]
    fn service_ids_round_trip(sub in arb_subscription(), rg in arb_segment(), name in arb_segment()) {
        let dashboard = DashboardId::new(&sub, &rg, &name);
        prop_assert_eq!(DashboardId::parse(&dashboard.id()).unwrap(), dashboard);

        let search = SearchServiceId::new(&sub, &rg, &name);
        prop_assert_eq!(SearchServiceId::parse(&search.id()).unwrap(), search);
    }

    #[test]
    fn job_child_ids_round_trip(job in arb_streaming_job(), name in arb_segment()) {
        let input = StreamInputId::new(&job, &name);
        let parsed = StreamInputId::parse(&input.id()).unwrap();
        prop_assert_eq!(parsed.streaming_job_id(), job.clone());
        prop_assert_eq!(parsed, input);

        let output = OutputId::new(&job, &name);
        prop_assert_eq!(OutputId::parse(&output.id()).unwrap(), output);

        let function = FunctionId::new(&job, &name);
        prop_assert_eq!(FunctionId::parse(&function.id()).unwrap(), function);
    }

    /// The display form names every value
    #[test]
    fn display_mentions_every_value(id in arb_private_cloud()) {
        let shown = id.to_string();
        prop_assert!(shown.starts_with("Private Cloud ("), "{}", shown);
        let quoted_name = format!("{:?}", id.name);
        let quoted_rg = format!("{:?}", id.resource_group);
        prop_assert!(shown.contains(&quoted_name));
        prop_assert!(shown.contains(&quoted_rg));
    }

    /// A child ID never parses as its parent, and the reverse
    #[test]
    fn parent_and_child_ids_are_distinct(parent in arb_private_cloud(), name in arb_segment()) {
        let cluster = ClusterId::new(&parent, &name);
        let err = PrivateCloudId::parse(&cluster.id()).unwrap_err();
        prop_assert!(matches!(err.kind, IdErrorKind::TrailingSegments(_)), "{:?}", err.kind);
        prop_assert!(ClusterId::parse(&parent.id()).is_err());
        prop_assert!(AuthorizationId::parse(&cluster.id()).is_err());
    }

    /// Static segments are matched case-sensitively
    #[test]
    fn static_segments_are_case_sensitive(id in arb_private_cloud()) {
        let shouting = id.id().replace("/resourceGroups/", "/resourcegroups/");
        let err = PrivateCloudId::parse(&shouting).unwrap_err();
        let is_unexpected_resource_groups = matches!(
            err.kind,
            IdErrorKind::UnexpectedSegment { expected: "resourceGroups", .. }
        );
        prop_assert!(is_unexpected_resource_groups, "{:?}", err.kind);
    }

    #[test]
    fn ids_without_leading_slash_are_rejected(id in arb_streaming_job()) {
        let relative = id.id().trim_start_matches('/').to_string();
        let err = StreamingJobId::parse(&relative).unwrap_err();
        prop_assert_eq!(err.kind, IdErrorKind::MissingLeadingSlash);
    }

    #[test]
    fn truncated_ids_are_rejected(id in arb_streaming_job(), keep in 0usize..8) {
        let full = id.id();
        let segments: Vec<&str> = full.trim_start_matches('/').split('/').collect();
        let truncated = format!("/{}", segments[..keep.min(segments.len() - 1)].join("/"));
        prop_assert!(StreamingJobId::parse(&truncated).is_err());
    }

    /// Normalising a location twice changes nothing
    #[test]
    fn location_normalisation_is_idempotent(location in "[A-Za-z]{1,12}( [A-Za-z0-9]{1,8}){0,2}") {
        let once = normalize_location(&location);
        prop_assert_eq!(normalize_location(&once), once.clone());
        prop_assert!(!once.contains(' '));
    }

    /// Whitespace and key order never survive normalisation
    #[test]
    fn json_normalisation_ignores_layout(
        keys in prop::collection::btree_set("[a-z]{1,8}", 1..6),
        indent in 0usize..4,
    ) {
        let value = serde_json::Value::Object(
            keys.iter().map(|k| (k.clone(), json!({"position": k.len()}))).collect(),
        );
        let spaced = serde_json::to_string_pretty(&value).unwrap().replace("  ", &" ".repeat(indent));
        let compact = value.to_string();
        prop_assert_eq!(normalize_json(&spaced), normalize_json(&compact));
        prop_assert_eq!(normalize_json(&normalize_json(&spaced)), normalize_json(&spaced));
    }

    #[test]
    fn generated_search_names_are_accepted(name in "[a-z0-9]{1,10}(-[a-z0-9]{1,10}){0,4}") {
        prop_assume!(name.len() >= 2);
        prop_assert!(validate_search_service_name(&name).is_ok(), "{}", name);
    }

    #[test]
    fn uppercase_search_names_are_rejected(name in "[a-z0-9]{0,10}[A-Z][a-z0-9]{0,10}") {
        prop_assert!(validate_search_service_name(&name).is_err());
    }
}
