use crate::resourceid::{describe, IdError, ParsedId, ResourceId, Segment};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DashboardId {
    pub subscription_id: String,
    pub resource_group: String,
    pub name: String,
}

impl DashboardId {
    pub fn new(subscription_id: &str, resource_group: &str, name: &str) -> Self {
        Self {
            subscription_id: subscription_id.to_string(),
            resource_group: resource_group.to_string(),
            name: name.to_string(),
        }
    }
}

impl ResourceId for DashboardId {
    const DESCRIPTION: &'static str = "Dashboard";
    const SEGMENTS: &'static [Segment] = &[
        Segment::Static("subscriptions"),
        Segment::Value("subscriptionId"),
        Segment::Static("resourceGroups"),
        Segment::Value("resourceGroupName"),
        Segment::Static("providers"),
        Segment::Static("Microsoft.Portal"),
        Segment::Static("dashboards"),
        Segment::Value("dashboardName"),
    ];

    fn from_parsed(mut parsed: ParsedId) -> Result<Self, IdError> {
        Ok(Self {
            subscription_id: parsed.take("subscriptionId")?,
            resource_group: parsed.take("resourceGroupName")?,
            name: parsed.take("dashboardName")?,
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

impl fmt::Display for DashboardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(
            f,
            Self::DESCRIPTION,
            &[
                ("Subscription", self.subscription_id.as_str()),
                ("Resource Group Name", self.resource_group.as_str()),
                ("Dashboard Name", self.name.as_str()),
            ],
        )
    }
}

/// Tenant-scoped: there is no subscription or resource group in the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantConfigurationId {
    pub name: String,
}

impl TenantConfigurationId {
    /// The service only accepts a configuration named `default`.
    pub const DEFAULT_NAME: &'static str = "default";

    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Default for TenantConfigurationId {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

impl ResourceId for TenantConfigurationId {
    const DESCRIPTION: &'static str = "Tenant Configuration";
    const SEGMENTS: &'static [Segment] = &[
        Segment::Static("providers"),
        Segment::Static("Microsoft.Portal"),
        Segment::Static("tenantConfigurations"),
        Segment::Value("configurationName"),
    ];

    fn from_parsed(mut parsed: ParsedId) -> Result<Self, IdError> {
        Ok(Self {
            name: parsed.take("configurationName")?,
        })
    }

    fn segment_values(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl fmt::Display for TenantConfigurationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, Self::DESCRIPTION, &[("Configuration Name", self.name.as_str())])
    }
}
