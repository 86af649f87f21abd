use serde::{Deserialize, Deserializer, Serialize};

mod cookie;

pub use cookie::cookie_value;

pub const MESH_ENDPOINT: &str = "/generate-mesh/";
pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const MIN_POLYGON_POINTS: usize = 3;
pub const DEFAULT_INTERIOR_POINTS: u32 = 100;
pub const DEFAULT_BOUNDARY_POINTS: u32 = 100;

/// A position in canvas pixel space. Travels over the wire as `[x, y]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// One mesh segment, `[[x1, y1], [x2, y2]]` on the wire.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Edge(pub Point, pub Point);

/// A missing `points` list reads as empty so it fails the polygon-size check
/// rather than the decoder.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MeshRequest {
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_count"
    )]
    pub num_points: Option<u32>,
}

// Counts may arrive as `50`, `50.0` or `"50"`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(f64),
        Text(String),
    }

    let value = match Option::<Count>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Count::Number(value)) => value,
        Some(Count::Text(text)) => text.trim().parse::<f64>().map_err(|_| {
            serde::de::Error::custom(format!("num_points is not a number: {text:?}"))
        })?,
    };
    let value = value.trunc();
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "num_points out of range: {value}"
        )));
    }
    Ok(Some(value as u32))
}

impl MeshRequest {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            num_points: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "RawMeshResponse", into = "RawMeshResponse")]
pub enum MeshResponse {
    Success {
        edges: Vec<Edge>,
        message: Option<String>,
    },
    Failure {
        error: String,
    },
}

impl MeshResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        MeshResponse::Failure {
            error: error.into(),
        }
    }

    pub fn into_result(self) -> Result<Vec<Edge>, String> {
        match self {
            MeshResponse::Success { edges, .. } => Ok(edges),
            MeshResponse::Failure { error } => Err(error),
        }
    }
}

// The JSON shape the mesh endpoint actually speaks.
#[derive(Serialize, Deserialize)]
struct RawMeshResponse {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edges: Option<Vec<Edge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TryFrom<RawMeshResponse> for MeshResponse {
    type Error = String;

    fn try_from(raw: RawMeshResponse) -> Result<Self, Self::Error> {
        if raw.success {
            let edges = raw
                .edges
                .ok_or_else(|| "successful response without edges".to_string())?;
            Ok(MeshResponse::Success {
                edges,
                message: raw.message,
            })
        } else {
            Ok(MeshResponse::Failure {
                error: raw.error.unwrap_or_else(|| "Unknown error".to_string()),
            })
        }
    }
}

impl From<MeshResponse> for RawMeshResponse {
    fn from(response: MeshResponse) -> Self {
        match response {
            MeshResponse::Success { edges, message } => RawMeshResponse {
                success: true,
                message,
                edges: Some(edges),
                error: None,
            },
            MeshResponse::Failure { error } => RawMeshResponse {
                success: false,
                message: None,
                edges: None,
                error: Some(error),
            },
        }
    }
}

pub fn decode_mesh_response(body: &str) -> Result<MeshResponse, serde_json::Error> {
    serde_json::from_str(body)
}
