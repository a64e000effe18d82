use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::propagation::Satellite;
use crate::render::{CurveHandle, SceneRenderer};
use crate::scene::TrajectoryCurve;
use crate::selection::tier::{InterestSets, InterestTier};

/// Why a trajectory curve is on screen. At most one curve exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CurveKey {
    Selection,
    Interest(usize),
}

#[derive(Debug, Clone, Copy)]
struct ActiveCurve {
    // None when sampling produced no points
    handle: Option<CurveHandle>,
    satellite: usize,
    anchor: DateTime<Utc>,
}

pub struct SelectionPolicy {
    interest: InterestSets,
    tiers: Vec<InterestTier>,
    selected: Option<usize>,
    curves: BTreeMap<CurveKey, ActiveCurve>,
    sample_step: Duration,
}

impl SelectionPolicy {
    pub fn new(satellites: &[Satellite], interest: InterestSets, sample_step: Duration) -> Self {
        let tiers = classify_all(satellites, &interest);
        Self {
            interest,
            tiers,
            selected: None,
            curves: BTreeMap::new(),
            sample_step,
        }
    }

    pub fn interest(&self) -> &InterestSets {
        &self.interest
    }

    pub fn tiers(&self) -> &[InterestTier] {
        &self.tiers
    }

    pub fn tier(&self, index: usize) -> Option<InterestTier> {
        self.tiers.get(index).copied()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn curve(&self, key: CurveKey) -> Option<CurveHandle> {
        self.curves.get(&key).and_then(|c| c.handle)
    }

    pub fn active_curves(&self) -> impl Iterator<Item = (CurveKey, CurveHandle)> + '_ {
        self.curves
            .iter()
            .filter_map(|(key, c)| c.handle.map(|h| (*key, h)))
    }

    pub fn active_curve_count(&self) -> usize {
        self.active_curves().count()
    }

    pub fn on_select<'a>(
        &mut self,
        index: usize,
        satellites: &'a [Satellite],
        instant: DateTime<Utc>,
        renderer: &mut dyn SceneRenderer,
    ) -> Option<&'a Satellite> {
        let Some(satellite) = satellites.get(index) else {
            log::warn!("Ignoring selection of unknown slot {}", index);
            return None;
        };

        log::info!("Selected {} (slot {})", satellite.name(), index);
        self.selected = Some(index);
        self.install(CurveKey::Selection, index, satellite, instant, renderer);
        Some(satellite)
    }

    pub fn deselect(&mut self, renderer: &mut dyn SceneRenderer) {
        if let Some(index) = self.selected.take() {
            log::info!("Deselected slot {}", index);
        }
        self.release(CurveKey::Selection, renderer);
    }

    /// Replace the interest sets and reclassify every satellite. Returns true
    /// when any tier changed.
    pub fn set_interest(
        &mut self,
        interest: InterestSets,
        satellites: &[Satellite],
        instant: DateTime<Utc>,
        renderer: &mut dyn SceneRenderer,
    ) -> bool {
        let tiers = classify_all(satellites, &interest);
        let changed = tiers != self.tiers;
        for (index, (old, new)) in self.tiers.iter().zip(&tiers).enumerate() {
            if old != new {
                if let Some(satellite) = satellites.get(index) {
                    log::info!("{} moved from {} to {}", satellite.name(), old, new);
                }
            }
        }
        self.interest = interest;
        self.tiers = tiers;
        self.sync_interest_curves(satellites, instant, renderer);
        changed
    }

    pub fn sync_interest_curves(
        &mut self,
        satellites: &[Satellite],
        instant: DateTime<Utc>,
        renderer: &mut dyn SceneRenderer,
    ) {
        let obsolete: Vec<CurveKey> = self
            .curves
            .keys()
            .filter(|key| match key {
                CurveKey::Interest(index) => self.tier(*index) != Some(InterestTier::Primary),
                CurveKey::Selection => false,
            })
            .copied()
            .collect();
        for key in obsolete {
            self.release(key, renderer);
        }

        let missing: Vec<usize> = self
            .tiers
            .iter()
            .enumerate()
            .filter(|(index, tier)| {
                **tier == InterestTier::Primary
                    && !self.curves.contains_key(&CurveKey::Interest(*index))
            })
            .map(|(index, _)| index)
            .collect();
        for index in missing {
            if let Some(satellite) = satellites.get(index) {
                self.install(CurveKey::Interest(index), index, satellite, instant, renderer);
            }
        }
    }

    /// Resample curves whose anchor is more than one orbital period away from
    /// `instant`, e.g. after a scrub or long fast-forward.
    pub fn refresh_stale(
        &mut self,
        satellites: &[Satellite],
        instant: DateTime<Utc>,
        renderer: &mut dyn SceneRenderer,
    ) {
        let stale: Vec<(CurveKey, usize)> = self
            .curves
            .iter()
            .filter(|(_, c)| {
                satellites
                    .get(c.satellite)
                    .map(|sat| (instant - c.anchor).abs() > sat.period())
                    .unwrap_or(false)
            })
            .map(|(key, c)| (*key, c.satellite))
            .collect();

        for (key, index) in stale {
            log::debug!("Refreshing {:?} curve for slot {}", key, index);
            self.install(key, index, &satellites[index], instant, renderer);
        }
    }

    pub fn release_all(&mut self, renderer: &mut dyn SceneRenderer) {
        let keys: Vec<CurveKey> = self.curves.keys().copied().collect();
        for key in keys {
            self.release(key, renderer);
        }
    }

    fn install(
        &mut self,
        key: CurveKey,
        index: usize,
        satellite: &Satellite,
        instant: DateTime<Utc>,
        renderer: &mut dyn SceneRenderer,
    ) {
        self.release(key, renderer);

        let handle = TrajectoryCurve::sample(index, satellite, instant, self.sample_step)
            .map(|curve| renderer.create_curve(key, &curve));
        self.curves.insert(
            key,
            ActiveCurve {
                handle,
                satellite: index,
                anchor: instant,
            },
        );
    }

    fn release(&mut self, key: CurveKey, renderer: &mut dyn SceneRenderer) {
        if let Some(handle) = self.curves.remove(&key).and_then(|c| c.handle) {
            renderer.dispose_curve(handle);
        }
    }
}

fn classify_all(satellites: &[Satellite], interest: &InterestSets) -> Vec<InterestTier> {
    satellites
        .iter()
        .map(|sat| interest.classify(sat.record()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::elements::ElementRecord;
    use crate::render::FrameInfo;
    use crate::scene::{PositionBuffer, DEFAULT_SAMPLE_STEP};

    const ALPHA_LINE1: &str = "1 90001U 24001A   24001.50000000  .00000000  00000-0  00000-0 0  9999";
    const ALPHA_LINE2: &str = "2 90001  53.0000 120.0000 0001000   0.0000   0.0000 15.05000000    16";
    const BRAVO_LINE1: &str = "1 90002U 24001A   24001.50000000  .00000000  00000-0  00000-0 0  9990";
    const BRAVO_LINE2: &str = "2 90002  53.0000 120.0000 0001000   0.0000 180.0000 15.05000000    16";

    #[derive(Default)]
    struct CountingRenderer {
        next: u64,
        live: BTreeSet<CurveHandle>,
        disposed: Vec<CurveHandle>,
    }

    impl SceneRenderer for CountingRenderer {
        fn update_instances(&mut self, _buffer: &PositionBuffer) {}

        fn update_tiers(&mut self, _tiers: &[InterestTier]) {}

        fn create_curve(&mut self, _key: CurveKey, curve: &TrajectoryCurve) -> CurveHandle {
            assert!(!curve.is_empty());
            self.next += 1;
            let handle = CurveHandle(self.next);
            self.live.insert(handle);
            handle
        }

        fn dispose_curve(&mut self, handle: CurveHandle) {
            assert!(self.live.remove(&handle), "double dispose of {handle:?}");
            self.disposed.push(handle);
        }

        fn present(&mut self, _frame: &FrameInfo) {}
    }

    fn satellites() -> Vec<Satellite> {
        vec![
            Satellite::from_record(ElementRecord::parse("ALPHA", ALPHA_LINE1, ALPHA_LINE2).unwrap())
                .unwrap(),
            Satellite::from_record(
                ElementRecord::parse("BRAVO", BRAVO_LINE1, BRAVO_LINE2).unwrap(),
            )
            .unwrap(),
        ]
    }

    #[test]
    fn reselecting_replaces_the_selection_curve() {
        let sats = satellites();
        let instant = sats[0].epoch();
        let mut renderer = CountingRenderer::default();
        let mut policy = SelectionPolicy::new(&sats, InterestSets::default(), DEFAULT_SAMPLE_STEP);

        let picked = policy.on_select(0, &sats, instant, &mut renderer).unwrap();
        assert_eq!(picked.name(), "ALPHA");
        let first = policy.curve(CurveKey::Selection).unwrap();

        policy.on_select(1, &sats, instant, &mut renderer);
        assert_eq!(renderer.disposed, vec![first]);
        assert_eq!(renderer.live.len(), 1);
        assert_eq!(policy.active_curve_count(), 1);
        assert_eq!(policy.selected(), Some(1));
    }

    #[test]
    fn unknown_index_changes_nothing() {
        let sats = satellites();
        let mut renderer = CountingRenderer::default();
        let mut policy = SelectionPolicy::new(&sats, InterestSets::default(), DEFAULT_SAMPLE_STEP);
        policy.on_select(0, &sats, sats[0].epoch(), &mut renderer);

        assert!(policy.on_select(7, &sats, sats[0].epoch(), &mut renderer).is_none());
        assert_eq!(policy.selected(), Some(0));
        assert_eq!(renderer.live.len(), 1);
    }

    #[test]
    fn deselect_releases_the_curve() {
        let sats = satellites();
        let mut renderer = CountingRenderer::default();
        let mut policy = SelectionPolicy::new(&sats, InterestSets::default(), DEFAULT_SAMPLE_STEP);
        policy.on_select(1, &sats, sats[0].epoch(), &mut renderer);
        policy.deselect(&mut renderer);
        assert!(renderer.live.is_empty());
        assert_eq!(policy.selected(), None);
        assert_eq!(policy.active_curve_count(), 0);
    }

    #[test]
    fn primary_tier_owns_one_curve_per_satellite() {
        let sats = satellites();
        let instant = sats[0].epoch();
        let mut renderer = CountingRenderer::default();
        let mut policy = SelectionPolicy::new(&sats, InterestSets::default(), DEFAULT_SAMPLE_STEP);

        let changed = policy.set_interest(
            InterestSets::new(["ALPHA"], ["BRAVO"]),
            &sats,
            instant,
            &mut renderer,
        );
        assert!(changed);
        assert_eq!(
            policy.tiers(),
            &[InterestTier::Primary, InterestTier::Secondary]
        );
        assert!(policy.curve(CurveKey::Interest(0)).is_some());
        assert!(policy.curve(CurveKey::Interest(1)).is_none());

        // same sets again: nothing rebuilt
        let changed = policy.set_interest(
            InterestSets::new(["ALPHA"], ["BRAVO"]),
            &sats,
            instant,
            &mut renderer,
        );
        assert!(!changed);
        assert_eq!(renderer.next, 1);

        policy.set_interest(InterestSets::default(), &sats, instant, &mut renderer);
        assert!(renderer.live.is_empty());
        assert_eq!(policy.tiers(), &[InterestTier::Other, InterestTier::Other]);
    }

    #[test]
    fn stale_curves_are_resampled() {
        let sats = satellites();
        let instant = sats[0].epoch();
        let mut renderer = CountingRenderer::default();
        let mut policy = SelectionPolicy::new(&sats, InterestSets::default(), DEFAULT_SAMPLE_STEP);
        policy.on_select(0, &sats, instant, &mut renderer);
        let original = policy.curve(CurveKey::Selection).unwrap();

        policy.refresh_stale(&sats, instant + Duration::minutes(30), &mut renderer);
        assert_eq!(policy.curve(CurveKey::Selection), Some(original));

        policy.refresh_stale(&sats, instant + Duration::hours(3), &mut renderer);
        let refreshed = policy.curve(CurveKey::Selection).unwrap();
        assert_ne!(refreshed, original);
        assert_eq!(renderer.disposed, vec![original]);
        assert_eq!(renderer.live.len(), 1);
    }

    #[test]
    fn release_all_disposes_everything() {
        let sats = satellites();
        let instant = sats[0].epoch();
        let mut renderer = CountingRenderer::default();
        let mut policy = SelectionPolicy::new(
            &sats,
            InterestSets::new(["ALPHA", "BRAVO"], Vec::<String>::new()),
            DEFAULT_SAMPLE_STEP,
        );
        policy.sync_interest_curves(&sats, instant, &mut renderer);
        policy.on_select(0, &sats, instant, &mut renderer);
        assert_eq!(renderer.live.len(), 3);

        policy.release_all(&mut renderer);
        assert!(renderer.live.is_empty());
        assert_eq!(policy.active_curve_count(), 0);
    }
}
