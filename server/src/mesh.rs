use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use polymesh_shared::{
    decode_mesh_response, Edge, MeshRequest, Point, DEFAULT_BOUNDARY_POINTS,
    DEFAULT_INTERIOR_POINTS,
};
use serde::Serialize;

/// What the upstream mesh generator is asked to do.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MeshJob {
    pub points: Vec<Point>,
    pub num_points: u32,
    pub num_boundary_points: u32,
}

impl MeshJob {
    pub fn from_request(request: MeshRequest) -> Self {
        Self {
            points: request.points,
            num_points: request.num_points.unwrap_or(DEFAULT_INTERIOR_POINTS),
            num_boundary_points: DEFAULT_BOUNDARY_POINTS,
        }
    }
}

#[derive(Debug)]
pub enum MeshServiceError {
    Unreachable(String),
    BadResponse(String),
    Rejected(String),
}

impl fmt::Display for MeshServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshServiceError::Unreachable(detail) => {
                write!(f, "Mesh service unreachable: {detail}")
            }
            MeshServiceError::BadResponse(detail) => {
                write!(f, "Mesh service sent an invalid response: {detail}")
            }
            MeshServiceError::Rejected(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for MeshServiceError {}

#[async_trait]
pub trait MeshService: Send + Sync {
    async fn generate(&self, job: &MeshJob) -> Result<Vec<Edge>, MeshServiceError>;
}

pub struct HttpMeshService {
    client: reqwest::Client,
    url: String,
}

impl HttpMeshService {
    pub fn new(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl MeshService for HttpMeshService {
    async fn generate(&self, job: &MeshJob) -> Result<Vec<Edge>, MeshServiceError> {
        let response = self
            .client
            .post(&self.url)
            .json(job)
            .send()
            .await
            .map_err(|e| MeshServiceError::Unreachable(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MeshServiceError::Unreachable(e.to_string()))?;
        decode_mesh_response(&body)
            .map_err(|e| MeshServiceError::BadResponse(format!("status {status}: {e}")))?
            .into_result()
            .map_err(MeshServiceError::Rejected)
    }
}
