use std::{cell::RefCell, rc::Rc, sync::Arc};

use async_compat::Compat;
use forecast_core::{ForecastProvider, Presenter, submit_search};
use slint::{ComponentHandle, Weak};
use tracing::error;

use crate::ui::{self, MainWindow};

/// The forecast window and the state behind it.
pub struct App {
    window: MainWindow,
    presenter: Rc<RefCell<Presenter>>,
    provider: Arc<dyn ForecastProvider>,
}

impl App {
    pub fn new(provider: Arc<dyn ForecastProvider>) -> anyhow::Result<Self> {
        let window = MainWindow::new()?;
        let presenter = Rc::new(RefCell::new(Presenter::new()));

        window.on_search({
            let window_weak = window.as_weak();
            let presenter = presenter.clone();
            let provider = provider.clone();

            move |text| start_search(&window_weak, &presenter, &provider, &text)
        });

        ui::render(&window, &presenter.borrow());

        Ok(Self { window, presenter, provider })
    }

    /// Show the window and block until it is closed.
    pub fn run(self, initial_city: Option<&str>) -> anyhow::Result<()> {
        if let Some(city) = initial_city {
            self.window.set_query(city.into());
            start_search(&self.window.as_weak(), &self.presenter, &self.provider, city);
        }

        self.window.run()?;
        Ok(())
    }
}

/// Dispatch a search. Retrieval runs on the event loop without blocking it;
/// the window is redrawn whenever the presenter's view changes.
fn start_search(
    window_weak: &Weak<MainWindow>,
    presenter: &Rc<RefCell<Presenter>>,
    provider: &Arc<dyn ForecastProvider>,
    raw: &str,
) {
    let window_weak = window_weak.clone();
    let presenter = presenter.clone();
    let provider = provider.clone();
    let raw = raw.to_string();

    let task = async move {
        submit_search(&presenter, provider.as_ref(), &raw, |presenter| {
            if let Some(window) = window_weak.upgrade() {
                ui::render(&window, presenter);
            }
        })
        .await;
    };

    if let Err(e) = slint::spawn_local(Compat::new(task)) {
        error!(error = %e, "failed to schedule search");
    }
}
