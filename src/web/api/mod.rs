pub mod clock;
pub mod error;
pub mod frame;
pub mod selection;

#[cfg(test)]
mod tests {
    use std::sync::{Arc, RwLock};

    use axum::{extract::State, http::StatusCode, Json};
    use tokio::sync::mpsc;

    use super::error::ApiError;
    use super::*;
    use crate::elements::ElementRecord;
    use crate::propagation::Satellite;
    use crate::session::SessionEvent;
    use crate::web::state::AppState;

    const ALPHA_LINE1: &str = "1 90001U 24001A   24001.50000000  .00000000  00000-0  00000-0 0  9999";
    const ALPHA_LINE2: &str = "2 90001  53.0000 120.0000 0001000   0.0000   0.0000 15.05000000    16";

    fn state() -> (AppState, mpsc::UnboundedReceiver<SessionEvent>) {
        let record = ElementRecord::parse("ALPHA", ALPHA_LINE1, ALPHA_LINE2).unwrap();
        let info = Satellite::from_record(record).unwrap().info();
        let (events, rx) = mpsc::unbounded_channel();
        let state = AppState {
            events,
            frame: Arc::new(RwLock::new(None)),
            satellites: Arc::new(vec![info]),
        };
        (state, rx)
    }

    #[tokio::test]
    async fn frame_is_unavailable_before_first_tick() {
        let (state, _rx) = state();
        let result = frame::latest_frame(State(state.clone())).await;
        assert!(matches!(result, Err(ApiError::Unavailable(_))));
        assert!(matches!(
            clock::status(State(state)).await,
            Err(ApiError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn satellites_default_to_other_tier() {
        let (state, _rx) = state();
        let Json(entries) = frame::list_satellites(State(state)).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, 0);
        assert_eq!(entries[0].info.name, "ALPHA");
        assert_eq!(entries[0].tier, crate::selection::InterestTier::Other);
    }

    #[tokio::test]
    async fn invalid_rate_is_not_queued() {
        let (state, mut rx) = state();
        let result = clock::set_rate(
            State(state.clone()),
            Json(clock::RateRequest { rate: 0.0 }),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(rx.try_recv().is_err());

        let status = clock::set_rate(State(state), Json(clock::RateRequest { rate: 60.0 }))
            .await
            .ok();
        assert_eq!(status, Some(StatusCode::ACCEPTED));
        assert_eq!(rx.try_recv().ok(), Some(SessionEvent::SetRate(60.0)));
    }

    #[tokio::test]
    async fn selection_checks_the_index() {
        let (state, mut rx) = state();
        let missing = selection::select(
            State(state.clone()),
            Json(selection::SelectRequest { index: 3 }),
        )
        .await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
        assert!(rx.try_recv().is_err());

        let found = selection::select(State(state), Json(selection::SelectRequest { index: 0 }))
            .await
            .ok()
            .map(|Json(response)| response.satellite.norad_id);
        assert_eq!(found, Some(90001));
        assert_eq!(rx.try_recv().ok(), Some(SessionEvent::Select(0)));
    }

    #[tokio::test]
    async fn stopped_session_is_reported() {
        let (state, rx) = state();
        drop(rx);
        let result = selection::deselect(State(state)).await;
        assert!(matches!(result, Err(ApiError::Unavailable(_))));
    }
}
