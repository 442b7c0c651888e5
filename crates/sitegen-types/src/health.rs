//! System health report

use serde::{Deserialize, Serialize};

/// `GET /health/detailed` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub uptime: f64,
    #[serde(default)]
    pub memory: MemoryUsage,
    #[serde(default)]
    pub stats: GenerationStats,
    #[serde(default)]
    pub services: Option<ServiceStatus>,
}

impl SystemHealth {
    pub fn is_healthy(&self) -> bool {
        let services_ok = self
            .services
            .as_ref()
            .map(|s| s.database != "unhealthy" && s.ai != "unhealthy")
            .unwrap_or(true);
        matches!(self.status.as_str(), "healthy" | "ok") && services_ok
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    #[serde(default)]
    pub used: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    #[serde(default)]
    pub total_websites: u64,
    #[serde(default)]
    pub public_websites: u64,
    #[serde(default)]
    pub private_websites: u64,
    #[serde(default)]
    pub generation_success_rate: f64,
    #[serde(default)]
    pub average_generation_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub ai: String,
}
