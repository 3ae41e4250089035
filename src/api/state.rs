use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;

use crate::application::{AskPipeline, GenerationService, RetrievalService};
use crate::domain::{ports::HealthProbe, Dependency};

#[derive(Clone)]
pub struct GatewayState {
    pub pipeline: Arc<AskPipeline>,
    pub admission: Arc<Semaphore>,
    pub admission_wait: Duration,
    pub probes: Vec<(Dependency, Arc<dyn HealthProbe>)>,
    pub cors_allowed_origins: Vec<String>,
    pub started_at: DateTime<Utc>,
}

impl GatewayState {
    pub fn new(pipeline: Arc<AskPipeline>, max_in_flight: usize) -> Self {
        Self {
            pipeline,
            admission: Arc::new(Semaphore::new(max_in_flight)),
            admission_wait: Duration::ZERO,
            probes: Vec::new(),
            cors_allowed_origins: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn with_admission_wait(mut self, wait: Duration) -> Self {
        self.admission_wait = wait;
        self
    }

    pub fn with_probe(mut self, dependency: Dependency, probe: Arc<dyn HealthProbe>) -> Self {
        self.probes.push((dependency, probe));
        self
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_allowed_origins = origins;
        self
    }
}

#[derive(Clone)]
pub struct RetrieverState {
    pub service: Arc<RetrievalService>,
    pub started_at: DateTime<Utc>,
}

impl RetrieverState {
    pub fn new(service: Arc<RetrievalService>) -> Self {
        Self {
            service,
            started_at: Utc::now(),
        }
    }
}

#[derive(Clone)]
pub struct GeneratorState {
    pub service: Arc<GenerationService>,
    pub started_at: DateTime<Utc>,
}

impl GeneratorState {
    pub fn new(service: Arc<GenerationService>) -> Self {
        Self {
            service,
            started_at: Utc::now(),
        }
    }
}
