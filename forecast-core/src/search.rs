use std::cell::RefCell;

use tracing::{info, warn};

use crate::{
    error::SearchError,
    icon::load_icon,
    model::{Forecast, Query},
    presenter::{DayCard, FailureKind, Presenter, SearchPhase, Submission},
    provider::ForecastProvider,
};

/// Submit `raw` to the presenter and, when a search starts, run it and apply
/// the outcome. `on_view` is called after every view change. Blank input is
/// answered without touching the provider. Returns whether a search result
/// was applied.
pub async fn submit_search<F>(
    presenter: &RefCell<Presenter>,
    provider: &dyn ForecastProvider,
    raw: &str,
    mut on_view: F,
) -> bool
where
    F: FnMut(&Presenter),
{
    let submission = presenter.borrow_mut().submit(raw);
    on_view(&presenter.borrow());

    let Submission::Started { ticket, query } = submission else {
        return false;
    };

    let outcome = run_search(provider, &query, |phase| {
        presenter.borrow_mut().advance(ticket, phase);
    })
    .await;

    let applied = presenter.borrow_mut().complete(ticket, outcome);
    if applied {
        on_view(&presenter.borrow());
    }
    applied
}

/// Resolve the city, fetch its forecast and build one card per day.
///
/// `observe` is told about each phase change so a caller can mirror progress
/// into a [`Presenter`](crate::presenter::Presenter). Cards come back in
/// forecast order; nothing is returned unless both lookups succeeded.
pub async fn run_search<F>(
    provider: &dyn ForecastProvider,
    query: &Query,
    mut observe: F,
) -> Result<Vec<DayCard>, SearchError>
where
    F: FnMut(SearchPhase),
{
    let location = match provider.resolve_location(query).await {
        Ok(location) => location,
        Err(e) => {
            warn!(city = %query, error = %e, "location lookup failed");
            observe(SearchPhase::Failed(FailureKind::NotFound));
            return Err(SearchError::LocationNotFound(e));
        }
    };
    observe(SearchPhase::Fetching);

    let forecast = match provider.fetch_forecast(&location).await {
        Ok(forecast) => forecast,
        Err(e) => {
            warn!(city = %query, location = %location, error = %e, "forecast fetch failed");
            observe(SearchPhase::Failed(FailureKind::NoData));
            return Err(SearchError::ForecastUnavailable(e));
        }
    };
    observe(SearchPhase::Rendering);

    let cards = build_cards(provider, &forecast).await;
    info!(city = %query, location = %location, cards = cards.len(), "forecast ready");
    Ok(cards)
}

/// Fetch both icons of every day and assemble the cards.
pub async fn build_cards(provider: &dyn ForecastProvider, forecast: &Forecast) -> Vec<DayCard> {
    let mut cards = Vec::with_capacity(forecast.len());
    for day in &forecast.days {
        let (day_icon, night_icon) =
            tokio::join!(load_icon(provider, day.day_icon), load_icon(provider, day.night_icon));
        cards.push(DayCard::new(day, day_icon, night_icon));
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::FetchError,
        model::IconId,
        testing::{FakeProvider, sample_days},
    };

    fn query(s: &str) -> Query {
        Query::parse(s).unwrap()
    }

    #[tokio::test]
    async fn blank_submission_makes_no_calls() {
        let provider = FakeProvider::seattle();
        let presenter = RefCell::new(Presenter::new());
        let mut redraws = 0;

        let applied = submit_search(&presenter, &provider, "  \t", |_| redraws += 1).await;

        assert!(!applied);
        assert_eq!(provider.calls(), 0);
        assert_eq!(redraws, 1);
        assert_eq!(presenter.borrow().view().status.as_deref(), Some("Please enter a city name."));
    }

    #[tokio::test]
    async fn submission_runs_search_and_replaces_view() {
        let provider = FakeProvider::seattle();
        let presenter = RefCell::new(Presenter::new());
        let mut seen = Vec::new();

        let applied =
            submit_search(&presenter, &provider, " Seattle ", |p| seen.push(p.view().cards.len()))
                .await;

        assert!(applied);
        // busy redraw with the old (empty) view, then the new cards
        assert_eq!(seen, [0, 5]);
        assert_eq!(provider.searched_for(), ["Seattle"]);
        assert_eq!(presenter.borrow().phase(), SearchPhase::Idle);
    }

    #[tokio::test]
    async fn seattle_renders_five_cards_in_date_order() {
        let provider = FakeProvider::seattle();
        let mut phases = Vec::new();

        let cards = run_search(&provider, &query("Seattle"), |p| phases.push(p)).await.unwrap();

        assert_eq!(cards.len(), 5);
        let dates: Vec<_> = cards.iter().map(|c| c.date_label.as_str()).collect();
        assert_eq!(dates, ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"]);
        assert!(cards.iter().all(|c| c.temperature_label == "40°F - 55°F"));
        assert!(cards.iter().all(|c| c.day_icon.id == IconId(1) && c.night_icon.id == IconId(33)));
        assert!(cards.iter().all(|c| !c.day_icon.placeholder && !c.night_icon.placeholder));

        assert_eq!(phases, [SearchPhase::Fetching, SearchPhase::Rendering]);
        // one search, one forecast, two icons per day
        assert_eq!(provider.calls(), 12);
        assert_eq!(provider.searched_for(), ["Seattle"]);
    }

    #[tokio::test]
    async fn empty_match_list_is_location_not_found() {
        let provider = FakeProvider { location: None, ..FakeProvider::seattle() };
        let mut phases = Vec::new();

        let err = run_search(&provider, &query("Nowhere123"), |p| phases.push(p))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::LocationNotFound(FetchError::EmptyResult)));
        assert_eq!(err.user_message(), "City not found. Please try again.");
        assert_eq!(phases, [SearchPhase::Failed(FailureKind::NotFound)]);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn forecast_error_is_forecast_unavailable() {
        let provider = FakeProvider { forecast: Err(500), ..FakeProvider::seattle() };
        let mut phases = Vec::new();

        let err = run_search(&provider, &query("Seattle"), |p| phases.push(p)).await.unwrap_err();

        assert!(matches!(
            err,
            SearchError::ForecastUnavailable(FetchError::ServerError { status: 500, .. })
        ));
        assert_eq!(err.user_message(), "Error fetching weather data.");
        assert_eq!(phases, [SearchPhase::Fetching, SearchPhase::Failed(FailureKind::NoData)]);
        // no icons are requested for a failed forecast
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn missing_icons_become_placeholders() {
        let provider = FakeProvider { icon: None, ..FakeProvider::seattle() };

        let cards = run_search(&provider, &query("Seattle"), |_| {}).await.unwrap();

        assert_eq!(cards.len(), 5);
        assert!(cards.iter().all(|c| c.day_icon.placeholder && c.night_icon.placeholder));
    }

    #[tokio::test]
    async fn corrupt_icons_become_placeholders() {
        let provider = FakeProvider { icon: Some(b"not an image".to_vec()), ..FakeProvider::seattle() };

        let cards = run_search(&provider, &query("Seattle"), |_| {}).await.unwrap();

        assert!(cards.iter().all(|c| c.day_icon.placeholder && c.night_icon.placeholder));
    }

    #[tokio::test]
    async fn cards_follow_forecast_order() {
        let mut days = sample_days();
        days.reverse();
        let forecast = Forecast { days };

        let cards = build_cards(&FakeProvider::seattle(), &forecast).await;

        let dates: Vec<_> = cards.iter().map(|c| c.date_label.as_str()).collect();
        assert_eq!(dates, ["2024-01-05", "2024-01-04", "2024-01-03", "2024-01-02", "2024-01-01"]);
    }
}
