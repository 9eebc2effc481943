//! Remote place resolver: reverse geocoding plus a time-zone clock, run on a
//! worker thread so the render loop never waits on the network.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use geohover::{
    lookup::{
        parse_local_time, parse_reverse, LookupRequest, LookupResult, DEFAULT_REMOTE_COOLDOWN,
    },
    GeoCoordinate, LookupError, PlaceInfo, PlaceResolver,
};
use std::{collections::VecDeque, thread, time::Duration};

/// Requests in flight before `submit` reports [`LookupError::Busy`].
const QUEUE_DEPTH: usize = 8;

#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Nominatim-style reverse endpoint (`?format=json&lat=..&lon=..`).
    pub geocode_url: String,
    /// World-time endpoint; the IANA zone name is appended as a path segment.
    pub time_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

struct GeocodeClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl GeocodeClient {
    fn new(endpoints: Endpoints) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(endpoints.timeout)
            .user_agent(concat!("globe_viewer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, endpoints })
    }

    async fn get_text(&self, req: reqwest::RequestBuilder) -> Result<String, LookupError> {
        let resp = req
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        resp.text()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))
    }

    async fn resolve(&self, coord: GeoCoordinate) -> Result<PlaceInfo, LookupError> {
        let req = self.http.get(&self.endpoints.geocode_url).query(&[
            ("format", "json".to_string()),
            ("lat", format!("{:.6}", coord.lat_deg)),
            ("lon", format!("{:.6}", coord.lon_deg)),
        ]);
        let reverse = parse_reverse(&self.get_text(req).await?, coord)?;

        let url = format!(
            "{}/{}",
            self.endpoints.time_url.trim_end_matches('/'),
            reverse.timezone
        );
        let local_time = parse_local_time(&self.get_text(self.http.get(url)).await?)?;

        Ok(PlaceInfo {
            country: reverse.country,
            timezone: reverse.timezone,
            local_time,
        })
    }
}

/// [`PlaceResolver`] backed by HTTP services.
pub struct RemoteResolver {
    requests: Sender<LookupRequest>,
    results: Receiver<LookupResult>,
    /// Failures raised on the caller's side of the channel.
    local: VecDeque<LookupResult>,
    cooldown: Duration,
    _worker: thread::JoinHandle<()>,
}

impl RemoteResolver {
    /// Starts the worker. Fails if the HTTP client or runtime cannot be built.
    pub fn spawn(endpoints: Endpoints, cooldown: Option<Duration>) -> anyhow::Result<Self> {
        let (req_tx, req_rx) = crossbeam_channel::bounded::<LookupRequest>(QUEUE_DEPTH);
        let (res_tx, res_rx) = crossbeam_channel::unbounded::<LookupResult>();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), String>>(1);

        log::info!(
            "Remote lookups via {} and {} (timeout {:?})",
            endpoints.geocode_url,
            endpoints.time_url,
            endpoints.timeout
        );

        let worker = thread::Builder::new()
            .name("geocode".into())
            .spawn(move || run_worker(endpoints, req_rx, res_tx, ready_tx))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => anyhow::bail!("failed to start lookup worker: {e}"),
            Err(_) => anyhow::bail!("lookup worker exited during startup"),
        }

        Ok(Self {
            requests: req_tx,
            results: res_rx,
            local: VecDeque::new(),
            cooldown: cooldown.unwrap_or(DEFAULT_REMOTE_COOLDOWN),
            _worker: worker,
        })
    }
}

impl PlaceResolver for RemoteResolver {
    fn cooldown(&self) -> Option<Duration> {
        Some(self.cooldown)
    }

    fn submit(&mut self, request: LookupRequest) {
        let ticket = request.ticket;
        let error = match self.requests.try_send(request) {
            Ok(()) => return,
            Err(TrySendError::Full(_)) => LookupError::Busy,
            Err(TrySendError::Disconnected(_)) => LookupError::Disconnected,
        };
        log::warn!("lookup #{} not submitted: {}", ticket, error);
        self.local.push_back(LookupResult {
            ticket,
            outcome: Err(error),
        });
    }

    fn poll(&mut self) -> Option<LookupResult> {
        self.local
            .pop_front()
            .or_else(|| self.results.try_recv().ok())
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

fn run_worker(
    endpoints: Endpoints,
    requests: Receiver<LookupRequest>,
    results: Sender<LookupResult>,
    ready: Sender<Result<(), String>>,
) {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("geocode worker failed to start: {}", e);
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    let client = {
        let _guard = rt.enter();
        match GeocodeClient::new(endpoints) {
            Ok(c) => c,
            Err(e) => {
                log::error!("geocode worker failed to start: {}", e);
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        }
    };
    let _ = ready.send(Ok(()));
    log::info!("geocode worker started");

    while let Ok(mut request) = requests.recv() {
        // Only the newest request can still reach the popup.
        while let Ok(newer) = requests.try_recv() {
            log::trace!("lookup #{} superseded by #{}", request.ticket, newer.ticket);
            request = newer;
        }

        let outcome = rt.block_on(client.resolve(request.coord));
        if let Err(e) = &outcome {
            log::debug!("lookup #{} at {} failed: {}", request.ticket, request.coord, e);
        }
        if results
            .send(LookupResult {
                ticket: request.ticket,
                outcome,
            })
            .is_err()
        {
            break;
        }
    }
    log::info!("geocode worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn unreachable_endpoints() -> Endpoints {
        // Port 1 is reserved and nothing listens there.
        Endpoints {
            geocode_url: "http://127.0.0.1:1/reverse".into(),
            time_url: "http://127.0.0.1:1/timezone".into(),
            timeout: Duration::from_secs(2),
        }
    }

    fn wait_for(resolver: &mut RemoteResolver) -> Option<LookupResult> {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if let Some(r) = resolver.poll() {
                return Some(r);
            }
            thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn uses_remote_cooldown_by_default() {
        let r = RemoteResolver::spawn(unreachable_endpoints(), None).unwrap();
        assert_eq!(r.cooldown(), Some(DEFAULT_REMOTE_COOLDOWN));
        assert_eq!(r.name(), "remote");
    }

    #[test]
    fn unreachable_service_reports_transport_failure() {
        let mut r = RemoteResolver::spawn(unreachable_endpoints(), None).unwrap();
        r.submit(LookupRequest {
            ticket: 7,
            coord: GeoCoordinate::new(10.0, 20.0),
        });

        let result = wait_for(&mut r).expect("worker should answer");
        assert_eq!(result.ticket, 7);
        assert!(matches!(result.outcome, Err(LookupError::Transport(_))));
    }
}
