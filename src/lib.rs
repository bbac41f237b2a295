//! Sleep-disorder prediction over pre-trained artifacts: a login-gated
//! terminal form that encodes lifestyle inputs, runs the classifier and
//! writes a PDF report with advice for the predicted disorder.

pub mod advice;
pub mod app;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod prediction;
pub mod report;
pub mod session;
pub mod utils;

pub use app::App;
pub use auth::{CredentialVerifier, StaticCredentials};
pub use config::AppConfig;
pub use error::{PredictorError, Result};
pub use model::{Classifier, ModelArtifact, PredictionResult};
pub use session::{MenuItem, Session};
pub use utils::io::{ArtifactPaths, Artifacts};
