use crate::resourceid::{describe, IdError, ParsedId, ResourceId, Segment};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrivateCloudId {
    pub subscription_id: String,
    pub resource_group: String,
    pub name: String,
}

impl PrivateCloudId {
    pub fn new(subscription_id: &str, resource_group: &str, name: &str) -> Self {
        Self {
            subscription_id: subscription_id.to_string(),
            resource_group: resource_group.to_string(),
            name: name.to_string(),
        }
    }
}

impl ResourceId for PrivateCloudId {
    const DESCRIPTION: &'static str = "Private Cloud";
    const SEGMENTS: &'static [Segment] = &[
        Segment::Static("subscriptions"),
        Segment::Value("subscriptionId"),
        Segment::Static("resourceGroups"),
        Segment::Value("resourceGroupName"),
        Segment::Static("providers"),
        Segment::Static("Microsoft.AVS"),
        Segment::Static("privateClouds"),
        Segment::Value("privateCloudName"),
    ];

    fn from_parsed(mut parsed: ParsedId) -> Result<Self, IdError> {
        Ok(Self {
            subscription_id: parsed.take("subscriptionId")?,
            resource_group: parsed.take("resourceGroupName")?,
            name: parsed.take("privateCloudName")?,
        })
    }

    fn segment_values(&self) -> Vec<&str> {
        vec![self.subscription_id.as_str(), self.resource_group.as_str(), self.name.as_str()]
    }
}

impl fmt::Display for PrivateCloudId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(
            f,
            Self::DESCRIPTION,
            &[
                ("Subscription", self.subscription_id.as_str()),
                ("Resource Group Name", self.resource_group.as_str()),
                ("Private Cloud Name", self.name.as_str()),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterId {
    pub subscription_id: String,
    pub resource_group: String,
    pub private_cloud_name: String,
    pub name: String,
}

impl ClusterId {
    pub fn new(private_cloud: &PrivateCloudId, name: &str) -> Self {
        Self {
            subscription_id: private_cloud.subscription_id.clone(),
            resource_group: private_cloud.resource_group.clone(),
            private_cloud_name: private_cloud.name.clone(),
            name: name.to_string(),
        }
    }

    pub fn private_cloud_id(&self) -> PrivateCloudId {
        PrivateCloudId::new(&self.subscription_id, &self.resource_group, &self.private_cloud_name)
    }
}

impl ResourceId for ClusterId {
    const DESCRIPTION: &'static str = "Cluster";
    const SEGMENTS: &'static [Segment] = &[
        Segment::Static("subscriptions"),
        Segment::Value("subscriptionId"),
        Segment::Static("resourceGroups"),
        Segment::Value("resourceGroupName"),
        Segment::Static("providers"),
        Segment::Static("Microsoft.AVS"),
        Segment::Static("privateClouds"),
        Segment::Value("privateCloudName"),
        Segment::Static("clusters"),
        Segment::Value("clusterName"),
    ];

    fn from_parsed(mut parsed: ParsedId) -> Result<Self, IdError> {
        Ok(Self {
            subscription_id: parsed.take("subscriptionId")?,
            resource_group: parsed.take("resourceGroupName")?,
            private_cloud_name: parsed.take("privateCloudName")?,
            name: parsed.take("clusterName")?,
        })
    }

    fn segment_values(&self) -> Vec<&str> {
        vec![
            self.subscription_id.as_str(),
            self.resource_group.as_str(),
            self.private_cloud_name.as_str(),
            self.name.as_str(),
        ]
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(
            f,
            Self::DESCRIPTION,
            &[
                ("Subscription", self.subscription_id.as_str()),
                ("Resource Group Name", self.resource_group.as_str()),
                ("Private Cloud Name", self.private_cloud_name.as_str()),
                ("Cluster Name", self.name.as_str()),
            ],
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorizationId {
    pub subscription_id: String,
    pub resource_group: String,
    pub private_cloud_name: String,
    pub name: String,
}

impl AuthorizationId {
    pub fn new(private_cloud: &PrivateCloudId, name: &str) -> Self {
        Self {
            subscription_id: private_cloud.subscription_id.clone(),
            resource_group: private_cloud.resource_group.clone(),
            private_cloud_name: private_cloud.name.clone(),
            name: name.to_string(),
        }
    }

    pub fn private_cloud_id(&self) -> PrivateCloudId {
        PrivateCloudId::new(&self.subscription_id, &self.resource_group, &self.private_cloud_name)
    }
}

impl ResourceId for AuthorizationId {
    const DESCRIPTION: &'static str = "Express Route Authorization";
    const SEGMENTS: &'static [Segment] = &[
        Segment::Static("subscriptions"),
        Segment::Value("subscriptionId"),
        Segment::Static("resourceGroups"),
        Segment::Value("resourceGroupName"),
        Segment::Static("providers"),
        Segment::Static("Microsoft.AVS"),
        Segment::Static("privateClouds"),
        Segment::Value("privateCloudName"),
        Segment::Static("authorizations"),
        Segment::Value("authorizationName"),
    ];

    fn from_parsed(mut parsed: ParsedId) -> Result<Self, IdError> {
        Ok(Self {
            subscription_id: parsed.take("subscriptionId")?,
            resource_group: parsed.take("resourceGroupName")?,
            private_cloud_name: parsed.take("privateCloudName")?,
            name: parsed.take("authorizationName")?,
        })
    }

    fn segment_values(&self) -> Vec<&str> {
        vec![
            self.subscription_id.as_str(),
            self.resource_group.as_str(),
            self.private_cloud_name.as_str(),
            self.name.as_str(),
        ]
    }
}

impl fmt::Display for AuthorizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(
            f,
            Self::DESCRIPTION,
            &[
                ("Subscription", self.subscription_id.as_str()),
                ("Resource Group Name", self.resource_group.as_str()),
                ("Private Cloud Name", self.private_cloud_name.as_str()),
                ("Authorization Name", self.name.as_str()),
            ],
        )
    }
}
