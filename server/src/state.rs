use std::path::PathBuf;
use std::sync::Arc;

use crate::mesh::MeshService;

pub const MESH_OK_MESSAGE: &str = "Mesh successfully generated!";

#[derive(Clone)]
pub struct AppState {
    pub mesh: Arc<dyn MeshService>,
    pub index_file: PathBuf,
}
