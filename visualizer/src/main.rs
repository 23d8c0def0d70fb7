use chart::{LineChart, XRange};
use iced::{
    widget::{button, column, row, scrollable, text, Canvas, Column, Container, Row},
    Alignment, Color, Element, Length, Task, Theme,
};
use log::info;
use spillcore::ingest::columns::DEFAULT_RESOURCE_PATH;
use spillcore::ingest::loader::DEFAULT_FETCH_TIMEOUT;
use spillcore::ingest::{ResourceRef, StaticLoader};
use spillcore::math::StatsHelper;
use spillcore::render::{error_message, EMPTY_MESSAGE, LOADING_MESSAGE};
use spillcore::view::{ViewSpec, ViewState};
use spillcore::Pipeline;
use std::time::Duration;

mod chart;

const SOURCE_ENV: &str = "SPILLVIZ_SOURCE";

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .theme(application_theme)
        .run()
}

fn application_title(state: &Visualizer) -> String {
    match state.views.get(state.selected) {
        Some(view) => format!("Milk Spillage Wastage | {}", view.axis.title),
        None => "Milk Spillage Wastage".into(),
    }
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

fn source_from_env() -> ResourceRef {
    let raw = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(SOURCE_ENV).ok())
        .unwrap_or_else(|| format!("http://127.0.0.1:9000{DEFAULT_RESOURCE_PATH}"));
    match raw.parse() {
        Ok(resource) => resource,
        Err(never) => match never {},
    }
}

#[derive(Debug)]
struct Visualizer {
    source: ResourceRef,
    timeout: Duration,
    views: Vec<ViewSpec>,
    states: Vec<ViewState>,
    selected: usize,
    history: Vec<String>,
    /// Bumped per load so only the newest response is applied.
    generation: u64,
    zoom: Option<XRange>,
}

#[derive(Debug, Clone)]
pub(crate) enum Message {
    Reload,
    ViewsLoaded(u64, Vec<ViewState>),
    SelectView(usize),
    /// New visible x range, or `None` to show everything.
    Zoom(Option<XRange>),
}

impl Visualizer {
    fn new(source: ResourceRef) -> Self {
        Visualizer {
            source,
            timeout: DEFAULT_FETCH_TIMEOUT,
            views: ViewSpec::all_presets(),
            states: Vec::new(),
            selected: 0,
            history: Vec::new(),
            generation: 0,
            zoom: None,
        }
    }

    fn boot() -> (Self, Task<Message>) {
        let mut state = Visualizer::new(source_from_env());
        let task = state.load_task();
        (state, task)
    }

    fn load_task(&mut self) -> Task<Message> {
        self.generation += 1;
        let generation = self.generation;
        Task::perform(
            load_views(self.source.clone(), self.views.clone(), self.timeout),
            move |states| Message::ViewsLoaded(generation, states),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Reload => {
                state.zoom = None;
                state.states = vec![ViewState::Loading; state.views.len()];
                state.push_history(format!("Reloading {}", state.source));
                state.load_task()
            }
            Message::ViewsLoaded(generation, _) if generation != state.generation => {
                info!("ignoring load #{generation}, #{} is newer", state.generation);
                Task::none()
            }
            Message::ViewsLoaded(_, states) => {
                let summary = states
                    .iter()
                    .zip(&state.views)
                    .map(|(s, v)| format!("{}={}", v.name, s.label()))
                    .collect::<Vec<_>>()
                    .join(", ");
                info!("views loaded from {}: {summary}", state.source);
                state.push_history(format!("Loaded: {summary}"));
                state.states = states;
                Task::none()
            }
            Message::SelectView(idx) => {
                if idx < state.views.len() && idx != state.selected {
                    state.selected = idx;
                    state.zoom = None;
                }
                Task::none()
            }
            Message::Zoom(range) => {
                state.zoom = range;
                Task::none()
            }
        }
    }

    fn current_state(&self) -> &ViewState {
        static LOADING: ViewState = ViewState::Loading;
        self.states.get(self.selected).unwrap_or(&LOADING)
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let tabs = state.views.iter().enumerate().fold(
            Column::new().spacing(6),
            |col, (idx, view)| {
                let label = if idx == state.selected {
                    format!("> {}", view.name)
                } else {
                    view.name.clone()
                };
                col.push(
                    button(text(label).size(14))
                        .on_press(Message::SelectView(idx))
                        .width(Length::Fill)
                        .padding(8),
                )
            },
        );

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let side_column = column![
            text("Views").size(26),
            text(format!("Source: {}", state.source)).size(12),
            button("Reload").on_press(Message::Reload).padding(10),
            tabs,
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(160.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(280.0));

        let Some(spec) = state.views.get(state.selected) else {
            return Container::new(side_column).into();
        };

        let body: Element<'_, Message> = match state.current_state() {
            ViewState::Loading => text(LOADING_MESSAGE).size(18).into(),
            ViewState::Error(message) => text(error_message(message))
                .size(18)
                .color(Color::from_rgb(0.95, 0.35, 0.35))
                .into(),
            ViewState::Empty => text(EMPTY_MESSAGE).size(18).into(),
            ViewState::Populated(series) => {
                let summary = series.iter().fold(Row::new().spacing(16), |row, line| {
                    let mean = StatsHelper::mean_y(&line.points).unwrap_or_default();
                    row.push(
                        text(format!(
                            "{}: {} points, mean {}",
                            line.name,
                            line.len(),
                            spec.axis.format_y(mean)
                        ))
                        .size(14),
                    )
                });
                let hint = match state.zoom {
                    Some(range) => format!(
                        "Zoomed to {} .. {} (right-click to reset)",
                        spec.axis.format_x_over(range.min, range.width()),
                        spec.axis.format_x_over(range.max, range.width())
                    ),
                    None => "Scroll or drag across the chart to zoom".to_string(),
                };
                column![
                    Canvas::new(LineChart::new(series, &spec.axis, state.zoom))
                        .width(Length::Fill)
                        .height(Length::Fixed(420.0)),
                    text(hint).size(12),
                    summary,
                ]
                .spacing(10)
                .into()
            }
        };

        let chart_column = column![
            text(spec.axis.title.clone()).size(24),
            text(format!("{} vs {}", spec.axis.y_label, spec.axis.x_label)).size(14),
            body,
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![side_column, chart_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn load_views(
    source: ResourceRef,
    views: Vec<ViewSpec>,
    timeout: Duration,
) -> Vec<ViewState> {
    match StaticLoader::new(timeout) {
        Ok(loader) => Pipeline::new(loader).load_views(&source, &views).await,
        Err(err) => vec![ViewState::Error(err.to_string()); views.len()],
    }
}
