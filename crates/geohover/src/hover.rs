//! Per-frame hover orchestration: surface hit → shader uniform + lookup → popup.

use crate::geo::GeoCoordinate;
use crate::lookup::{Cooldown, LookupRequest, LookupResult, PlaceResolver};
use crate::pick::SurfaceHit;
use crate::popup::PopupState;
use glam::Vec2;
use std::time::Instant;

/// The hover coordinate the point material reads. Keeps its last value on
/// frames without a hit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShaderUniformState {
    pub mouse_uv: Vec2,
}

/// Everything the tracker needs about one frame.
#[derive(Debug, Clone, Copy)]
pub struct HoverFrame {
    pub hit: Option<SurfaceHit>,
    /// Raw pointer position, logical pixels.
    pub pointer: Vec2,
    pub now: Instant,
}

/// Owns hover, uniform and popup state for the render thread.
///
/// Lookups are latest-wins: each submission gets a fresh ticket, and only the
/// result carrying the current ticket may touch the popup. Leaving the globe
/// invalidates the ticket, so a late answer for a spot the pointer has left is
/// dropped.
#[derive(Debug)]
pub struct HoverTracker {
    uniform: ShaderUniformState,
    popup: PopupState,
    cooldown: Cooldown,
    next_ticket: u64,
    current: Option<u64>,
    last_coord: Option<GeoCoordinate>,
}

impl HoverTracker {
    pub fn new<R: PlaceResolver + ?Sized>(resolver: &R) -> Self {
        Self {
            uniform: ShaderUniformState::default(),
            popup: PopupState::new(),
            cooldown: Cooldown::new(resolver.cooldown()),
            next_ticket: 1,
            current: None,
            last_coord: None,
        }
    }

    pub fn uniform(&self) -> ShaderUniformState {
        self.uniform
    }

    pub fn popup(&self) -> &PopupState {
        &self.popup
    }

    /// Geographic coordinate under the pointer this frame, if any.
    pub fn hovered(&self) -> Option<GeoCoordinate> {
        self.last_coord
    }

    /// Advances one frame. Returns the UV to upload when there was a hit.
    pub fn update<R: PlaceResolver + ?Sized>(
        &mut self,
        frame: HoverFrame,
        resolver: &mut R,
    ) -> Option<Vec2> {
        let uploaded = match frame.hit {
            None => {
                self.popup.hide();
                self.current = None;
                self.last_coord = None;
                None
            }
            Some(hit) => {
                self.uniform.mouse_uv = hit.uv;
                self.popup.follow(frame.pointer);

                let coord = GeoCoordinate::from_uv(hit.uv);
                self.last_coord = Some(coord);

                if self.cooldown.try_begin(frame.now) {
                    let ticket = self.next_ticket;
                    self.next_ticket += 1;
                    self.current = Some(ticket);
                    resolver.submit(LookupRequest { ticket, coord });
                }
                Some(hit.uv)
            }
        };

        while let Some(result) = resolver.poll() {
            self.apply(result, frame.pointer);
        }

        uploaded
    }

    fn apply(&mut self, result: LookupResult, pointer: Vec2) {
        if self.current != Some(result.ticket) {
            log::trace!("dropping stale lookup #{}", result.ticket);
            return;
        }
        self.current = None;

        match result.outcome {
            Ok(place) => self.popup.show(place, pointer),
            Err(e) => {
                log::debug!("lookup #{} failed: {}", result.ticket, e);
                self.popup.hide();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupError;
    use crate::place::{CountryBox, CountryTable, LocalResolver, PlaceInfo};
    use crate::popup::PopupPhase;
    use glam::Vec3;
    use std::collections::VecDeque;
    use std::time::Duration;

    /// Records submissions; answers only when told to.
    #[derive(Default)]
    struct ScriptedResolver {
        cooldown: Option<Duration>,
        submitted: Vec<LookupRequest>,
        ready: VecDeque<LookupResult>,
    }

    impl ScriptedResolver {
        fn remote() -> Self {
            Self {
                cooldown: Some(Duration::from_millis(1500)),
                ..Default::default()
            }
        }

        fn answer(&mut self, ticket: u64, outcome: Result<PlaceInfo, LookupError>) {
            self.ready.push_back(LookupResult { ticket, outcome });
        }
    }

    impl PlaceResolver for ScriptedResolver {
        fn cooldown(&self) -> Option<Duration> {
            self.cooldown
        }
        fn submit(&mut self, request: LookupRequest) {
            self.submitted.push(request);
        }
        fn poll(&mut self) -> Option<LookupResult> {
            self.ready.pop_front()
        }
        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn hit(u: f32, v: f32) -> Option<SurfaceHit> {
        Some(SurfaceHit {
            uv: Vec2::new(u, v),
            point: Vec3::Z,
            distance: 3.0,
        })
    }

    fn frame(hit: Option<SurfaceHit>, now: Instant) -> HoverFrame {
        HoverFrame {
            hit,
            pointer: Vec2::new(200.0, 100.0),
            now,
        }
    }

    fn place(name: &str) -> PlaceInfo {
        PlaceInfo {
            country: name.into(),
            timezone: "Etc/GMT".into(),
            local_time: "00:00:00".into(),
        }
    }

    #[test]
    fn no_hit_hides_and_issues_nothing() {
        let mut r = ScriptedResolver::remote();
        let mut t = HoverTracker::new(&r);

        let uploaded = t.update(frame(None, Instant::now()), &mut r);
        assert!(uploaded.is_none());
        assert!(r.submitted.is_empty());
        assert_eq!(t.popup().phase(), PopupPhase::Hidden);
        assert_eq!(t.uniform().mouse_uv, Vec2::ZERO);
    }

    #[test]
    fn hit_uploads_uv_and_submits() {
        let mut r = ScriptedResolver::remote();
        let mut t = HoverTracker::new(&r);

        let uploaded = t.update(frame(hit(0.5, 0.5), Instant::now()), &mut r);
        assert_eq!(uploaded, Some(Vec2::new(0.5, 0.5)));
        assert_eq!(r.submitted.len(), 1);
        let coord = r.submitted[0].coord;
        assert!(coord.lat_deg.abs() < 1e-9 && coord.lon_deg.abs() < 1e-9);
        // Hidden until the answer arrives.
        assert!(!t.popup().is_visible());
    }

    #[test]
    fn uniform_keeps_last_value_without_hit() {
        let mut r = ScriptedResolver::remote();
        let mut t = HoverTracker::new(&r);
        let t0 = Instant::now();

        t.update(frame(hit(0.25, 0.75), t0), &mut r);
        t.update(frame(None, t0 + Duration::from_millis(16)), &mut r);
        assert_eq!(t.uniform().mouse_uv, Vec2::new(0.25, 0.75));
        assert!(t.hovered().is_none());
    }

    #[test]
    fn cooldown_limits_remote_requests() {
        let mut r = ScriptedResolver::remote();
        let mut t = HoverTracker::new(&r);
        let t0 = Instant::now();

        t.update(frame(hit(0.5, 0.5), t0), &mut r);
        t.update(frame(hit(0.6, 0.5), t0 + Duration::from_millis(500)), &mut r);
        assert_eq!(r.submitted.len(), 1);

        t.update(frame(hit(0.7, 0.5), t0 + Duration::from_millis(1600)), &mut r);
        assert_eq!(r.submitted.len(), 2);
    }

    #[test]
    fn success_shows_popup_next_to_pointer() {
        let mut r = ScriptedResolver::remote();
        let mut t = HoverTracker::new(&r);
        let t0 = Instant::now();

        t.update(frame(hit(0.5, 0.5), t0), &mut r);
        let ticket = r.submitted[0].ticket;
        r.answer(ticket, Ok(place("Testland")));
        t.update(frame(hit(0.5, 0.5), t0 + Duration::from_millis(16)), &mut r);

        assert!(t.popup().is_visible());
        assert_eq!(t.popup().anchor(), Vec2::new(215.0, 115.0));
        assert!(t.popup().text().unwrap().starts_with("Testland\n"));
    }

    #[test]
    fn failure_ends_hidden_without_old_content() {
        let mut r = ScriptedResolver::remote();
        let mut t = HoverTracker::new(&r);
        let t0 = Instant::now();

        t.update(frame(hit(0.5, 0.5), t0), &mut r);
        r.answer(r.submitted[0].ticket, Ok(place("Testland")));
        t.update(frame(hit(0.5, 0.5), t0), &mut r);
        assert!(t.popup().is_visible());

        let later = t0 + Duration::from_millis(2000);
        t.update(frame(hit(0.6, 0.5), later), &mut r);
        r.answer(
            r.submitted[1].ticket,
            Err(LookupError::Transport("connection reset".into())),
        );
        t.update(frame(hit(0.6, 0.5), later), &mut r);

        assert_eq!(t.popup().phase(), PopupPhase::Hidden);
        assert!(t.popup().content().is_none());
    }

    #[test]
    fn result_arriving_after_leaving_globe_is_dropped() {
        let mut r = ScriptedResolver::remote();
        let mut t = HoverTracker::new(&r);
        let t0 = Instant::now();

        t.update(frame(hit(0.5, 0.5), t0), &mut r);
        let ticket = r.submitted[0].ticket;
        t.update(frame(None, t0), &mut r);

        r.answer(ticket, Ok(place("Testland")));
        t.update(frame(None, t0), &mut r);
        assert!(!t.popup().is_visible());
    }

    #[test]
    fn superseded_result_is_dropped() {
        let mut r = ScriptedResolver::remote();
        let mut t = HoverTracker::new(&r);
        let t0 = Instant::now();

        t.update(frame(hit(0.5, 0.5), t0), &mut r);
        t.update(frame(hit(0.6, 0.5), t0 + Duration::from_millis(1500)), &mut r);
        let (old, new) = (r.submitted[0].ticket, r.submitted[1].ticket);

        r.answer(old, Ok(place("Stale")));
        t.update(frame(hit(0.6, 0.5), t0 + Duration::from_millis(1516)), &mut r);
        assert!(!t.popup().is_visible());

        r.answer(new, Ok(place("Fresh")));
        t.update(frame(hit(0.6, 0.5), t0 + Duration::from_millis(1532)), &mut r);
        assert_eq!(t.popup().content().unwrap().country, "Fresh");
    }

    #[test]
    fn local_resolver_shows_in_same_frame() {
        let table = CountryTable::new(vec![CountryBox::new("Testland", 10.0, 20.0, 10.0, 20.0)]);
        let mut r = LocalResolver::new(table);
        let mut t = HoverTracker::new(&r);

        let uv = GeoCoordinate::new(15.0, 15.0).to_uv();
        t.update(frame(hit(uv.x, uv.y), Instant::now()), &mut r);
        assert_eq!(t.popup().content().unwrap().country, "Testland");

        let uv = GeoCoordinate::new(0.0, 0.0).to_uv();
        t.update(frame(hit(uv.x, uv.y), Instant::now()), &mut r);
        assert_eq!(t.popup().content().unwrap().country, "Unknown");
    }
}
