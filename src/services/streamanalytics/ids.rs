use crate::resourceid::{describe, IdError, ParsedId, ResourceId, Segment};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamingJobId {
    pub subscription_id: String,
    pub resource_group: String,
    pub name: String,
}

impl StreamingJobId {
    pub fn new(subscription_id: &str, resource_group: &str, name: &str) -> Self {
        Self {
            subscription_id: subscription_id.to_string(),
            resource_group: resource_group.to_string(),
            name: name.to_string(),
        }
    }
}

impl ResourceId for StreamingJobId {
    const DESCRIPTION: &'static str = "Streaming Job";
    const SEGMENTS: &'static [Segment] = &[
        Segment::Static("subscriptions"),
        Segment::Value("subscriptionId"),
        Segment::Static("resourceGroups"),
        Segment::Value("resourceGroupName"),
        Segment::Static("providers"),
        Segment::Static("Microsoft.StreamAnalytics"),
        Segment::Static("streamingjobs"),
        Segment::Value("jobName"),
    ];

    fn from_parsed(mut parsed: ParsedId) -> Result<Self, IdError> {
        Ok(Self {
            subscription_id: parsed.take("subscriptionId")?,
            resource_group: parsed.take("resourceGroupName")?,
            name: parsed.take("jobName")?,
        })
    }

    fn segment_values(&self) -> Vec<&str> {
        vec![self.subscription_id.as_str(), self.resource_group.as_str(), self.name.as_str()]
    }
}

impl fmt::Display for StreamingJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(
            f,
            Self::DESCRIPTION,
            &[
                ("Subscription", self.subscription_id.as_str()),
                ("Resource Group Name", self.resource_group.as_str()),
                ("Job Name", self.name.as_str()),
            ],
        )
    }
}

/// Inputs, outputs and functions all hang off a streaming job with the same
/// shape; only the collection segment and the labels differ.
macro_rules! job_child_id {
    ($name:ident, $description:literal, $collection:literal, $key:literal, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub subscription_id: String,
            pub resource_group: String,
            pub streaming_job_name: String,
            pub name: String,
        }

        impl $name {
            pub fn new(job: &StreamingJobId, name: &str) -> Self {
                Self {
                    subscription_id: job.subscription_id.clone(),
                    resource_group: job.resource_group.clone(),
                    streaming_job_name: job.name.clone(),
                    name: name.to_string(),
                }
            }

            pub fn streaming_job_id(&self) -> StreamingJobId {
                StreamingJobId::new(&self.subscription_id, &self.resource_group, &self.streaming_job_name)
            }
        }

        impl ResourceId for $name {
            const DESCRIPTION: &'static str = $description;
            const SEGMENTS: &'static [Segment] = &[
                Segment::Static("subscriptions"),
                Segment::Value("subscriptionId"),
                Segment::Static("resourceGroups"),
                Segment::Value("resourceGroupName"),
                Segment::Static("providers"),
                Segment::Static("Microsoft.StreamAnalytics"),
                Segment::Static("streamingjobs"),
                Segment::Value("jobName"),
                Segment::Static($collection),
                Segment::Value($key),
            ];

            fn from_parsed(mut parsed: ParsedId) -> Result<Self, IdError> {
                Ok(Self {
                    subscription_id: parsed.take("subscriptionId")?,
                    resource_group: parsed.take("resourceGroupName")?,
                    streaming_job_name: parsed.take("jobName")?,
                    name: parsed.take($key)?,
                })
            }

            fn segment_values(&self) -> Vec<&str> {
                vec![
                    self.subscription_id.as_str(),
                    self.resource_group.as_str(),
                    self.streaming_job_name.as_str(),
                    self.name.as_str(),
                ]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                describe(
                    f,
                    Self::DESCRIPTION,
                    &[
                        ("Subscription", self.subscription_id.as_str()),
                        ("Resource Group Name", self.resource_group.as_str()),
                        ("Job Name", self.streaming_job_name.as_str()),
                        ($label, self.name.as_str()),
                    ],
                )
            }
        }
    };
}

job_child_id!(StreamInputId, "Stream Input", "inputs", "inputName", "Input Name");
job_child_id!(OutputId, "Output", "outputs", "outputName", "Output Name");
job_child_id!(FunctionId, "Function", "functions", "functionName", "Function Name");
