use clap::{Parser, ValueEnum};
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResolverKind {
    /// Built-in bounding-box table and the local clock. No network.
    Local,
    /// Reverse geocoding and world-time HTTP services.
    Remote,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "globe_viewer", about = "Point-cloud globe with hover place lookup")]
pub struct Config {
    /// Directory searched for the globe textures.
    #[arg(long, env = "GLOBE_ASSETS_DIR", default_value = "assets")]
    pub assets_dir: PathBuf,

    #[arg(long, env = "GLOBE_RESOLVER", value_enum, default_value_t = ResolverKind::Local)]
    pub resolver: ResolverKind,

    #[arg(
        long,
        env = "GLOBE_GEOCODE_URL",
        default_value = "https://nominatim.openstreetmap.org/reverse"
    )]
    pub geocode_url: String,

    #[arg(
        long,
        env = "GLOBE_TIME_URL",
        default_value = "https://worldtimeapi.org/api/timezone"
    )]
    pub time_url: String,

    /// Minimum spacing between remote lookups.
    #[arg(long, env = "GLOBE_COOLDOWN_MS", default_value_t = 1500)]
    pub cooldown_ms: u64,

    #[arg(long, env = "GLOBE_LOOKUP_TIMEOUT_MS", default_value_t = 5000)]
    pub lookup_timeout_ms: u64,

    /// JSON country table replacing the built-in one (local resolver only).
    #[arg(long, env = "GLOBE_COUNTRIES")]
    pub countries: Option<PathBuf>,

    #[arg(long, default_value_t = 4500)]
    pub stars: usize,

    /// Icosphere subdivision of the point cloud.
    #[arg(long, default_value_t = 120, value_parser = clap::value_parser!(u32).range(1..=400))]
    pub point_detail: u32,

    /// Point sprite diameter in pixels.
    #[arg(long, default_value_t = 4.0)]
    pub point_size: f32,
}

impl Config {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::try_parse_from(["globe_viewer"]).unwrap();
        assert_eq!(c.resolver, ResolverKind::Local);
        assert_eq!(c.cooldown(), Duration::from_millis(1500));
        assert_eq!(c.point_detail, 120);
        assert!(c.countries.is_none());
    }

    #[test]
    fn remote_with_overrides() {
        let c = Config::try_parse_from([
            "globe_viewer",
            "--resolver",
            "remote",
            "--cooldown-ms",
            "250",
            "--geocode-url",
            "http://localhost:8080/reverse",
        ])
        .unwrap();
        assert_eq!(c.resolver, ResolverKind::Remote);
        assert_eq!(c.cooldown(), Duration::from_millis(250));
        assert_eq!(c.geocode_url, "http://localhost:8080/reverse");
    }

    #[test]
    fn rejects_zero_detail() {
        assert!(Config::try_parse_from(["globe_viewer", "--point-detail", "0"]).is_err());
    }
}
