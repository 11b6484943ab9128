use crate::resourceid::{describe, IdError, ParsedId, ResourceId, Segment};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchServiceId {
    pub subscription_id: String,
    pub resource_group: String,
    pub name: String,
}

impl SearchServiceId {
    pub fn new(subscription_id: &str, resource_group: &str, name: &str) -> Self {
        Self {
            subscription_id: subscription_id.to_string(),
            resource_group: resource_group.to_string(),
            name: name.to_string(),
        }
    }
}

impl ResourceId for SearchServiceId {
    const DESCRIPTION: &'static str = "Search Service";
    const SEGMENTS: &'static [Segment] = &[
        Segment::Static("subscriptions"),
        Segment::Value("subscriptionId"),
        Segment::Static("resourceGroups"),
        Segment::Value("resourceGroupName"),
        Segment::Static("providers"),
        Segment::Static("Microsoft.Search"),
        Segment::Static("searchServices"),
        Segment::Value("searchServiceName"),
    ];

    fn from_parsed(mut parsed: ParsedId) -> Result<Self, IdError> {
        Ok(Self {
            subscription_id: parsed.take("subscriptionId")?,
            resource_group: parsed.take("resourceGroupName")?,
            name: parsed.take("searchServiceName")?,
        })
    }

    fn segment_values(&self) -> Vec<&str> {
        vec![
            self.subscription_id.as_str(),
            self.resource_group.as_str(),
            self.name.as_str(),
        ]
    }
}

impl fmt::Display for SearchServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(
            f,
            Self::DESCRIPTION,
            &[
                ("Subscription", self.subscription_id.as_str()),
                ("Resource Group Name", self.resource_group.as_str()),
                ("Search Service Name", self.name.as_str()),
            ],
        )
    }
}
