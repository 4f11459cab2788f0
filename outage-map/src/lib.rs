//! # outage-map
//!
//! Détermine les barangays et feeders touchés par une zone d'interruption
//! tracée à la main.
//!
//! ## Features
//!
//! - Matching d'une zone ou d'un lot de zones (parallèle avec rayon)
//! - Doublons ignorés grâce à l'empreinte blake3 des zones
//! - Export GeoJSON des barangays touchés
//! - Rapport JSON avec statut, anomalies et somme de contrôle du catalogue
//!
//! ## Usage CLI
//!
//! ```bash
//! # Une zone
//! outage-map match --regions barangays.geojson --coverage coverage.json --drawn zone.geojson
//!
//! # Un lot de zones
//! outage-map batch --regions barangays.geojson --coverage coverage.json \
//!     --drawn "drafts/*.geojson" --output results/
//!
//! # Jeu de données alphabétique des barangays
//! outage-map catalog --regions barangays.geojson --output barangays.json
//! ```

pub mod config;
pub mod export;
pub mod fingerprint;
pub mod pipeline;
pub mod report;

pub use config::Config;
pub use pipeline::{load_inputs, process_drawn, DrawnResult, Inputs};
pub use report::{MatchReport, MatchStatus};
