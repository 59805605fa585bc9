use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of the siswa table. Roster data is read-only reference data here;
/// enrollment management lives elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Student {
    pub id: u64,
    pub kelas_id: u64,
    pub nama: String,
    pub rfid_tag: Option<String>,
}
