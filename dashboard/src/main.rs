use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        checkbox, column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use nexuscore::activation::{ActivationMachine, TransitionRejected};
use nexuscore::audio::{ring_quietly, LogChime};
use nexuscore::auth::{Authenticator, MemorySessionStore};
use nexuscore::controls::{ControlPanel, ToggleError, ToggleOutcome};
use nexuscore::notify::{Notice, Severity};
use nexuscore::prelude::SonarPhase;
use nexuscore::signal::diagnostics::format_uptime;
use nexuscore::signal::{
    DiagnosticsMonitor, DiagnosticsReading, EchoSource, SimulatedEcho, WeatherReading,
    WeatherStation,
};
use nexuscore::sweep::{SweepEngine, SweepTick};
use nexuscore::tracker::PointTracker;
use std::f32::consts::PI;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    "Nexus Console".into()
}

fn application_subscription(state: &Dashboard) -> Subscription<Message> {
    if state.console.is_some() {
        Subscription::batch([
            time::every(Duration::from_millis(30)).map(|_| Message::SweepFrame),
            time::every(Duration::from_secs(5)).map(|_| Message::WeatherRefresh),
            time::every(Duration::from_secs(1)).map(|_| Message::DiagnosticsPulse),
        ])
    } else {
        Subscription::none()
    }
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

struct Dashboard {
    auth: Authenticator<MemorySessionStore>,
    login: LoginForm,
    console: Option<Console>,
}

#[derive(Default)]
struct LoginForm {
    username: String,
    password: String,
    error: Option<String>,
    verifying: bool,
}

/// Everything behind the login gate. Dropped wholesale on logout, which
/// releases the machine, the tracker and every pending point with it.
struct Console {
    username: String,
    machine: Arc<ActivationMachine>,
    engine: SweepEngine,
    tracker: PointTracker,
    echo: SimulatedEcho,
    panel: ControlPanel,
    weather_station: WeatherStation,
    weather: WeatherReading,
    diagnostics: DiagnosticsMonitor,
    diagnostics_reading: DiagnosticsReading,
    pending: Option<PendingConfirm>,
    dont_ask_again: bool,
    notices: Vec<Notice>,
}

enum PendingConfirm {
    SonarActivation,
    ControlShutdown { id: u8, name: String },
}

#[derive(Debug, Clone, Copy)]
enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone)]
enum Message {
    LoginFieldChanged(LoginField, String),
    SubmitLogin,
    CredentialsChecked,
    Logout,
    SweepFrame,
    WeatherRefresh,
    DiagnosticsPulse,
    SonarTogglePressed,
    SafetyConfirmed,
    SafetyCancelled,
    DontAskAgainToggled(bool),
    SonarSettled(Result<(), TransitionRejected>),
    ControlPressed(u8),
    ControlShutdownConfirmed,
    ControlShutdownCancelled,
}

impl Console {
    fn boot(username: String) -> Self {
        let mut weather_station = WeatherStation::from_entropy();
        let weather = weather_station.sample();
        let diagnostics = DiagnosticsMonitor::from_entropy();
        let diagnostics_reading = diagnostics.reading();
        Self {
            username,
            machine: Arc::new(ActivationMachine::default()),
            engine: SweepEngine::new(),
            tracker: PointTracker::new(),
            echo: SimulatedEcho::from_entropy(),
            panel: ControlPanel::defaults(),
            weather_station,
            weather,
            diagnostics,
            diagnostics_reading,
            pending: None,
            dont_ask_again: false,
            notices: Vec::new(),
        }
    }

    fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
        if self.notices.len() > 20 {
            self.notices.remove(0);
        }
    }
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        (
            Dashboard {
                auth: Authenticator::restore(MemorySessionStore::new()),
                login: LoginForm::default(),
                console: None,
            },
            Task::none(),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::LoginFieldChanged(field, value) => {
                match field {
                    LoginField::Username => state.login.username = value,
                    LoginField::Password => state.login.password = value,
                }
                Task::none()
            }
            Message::SubmitLogin => {
                state.login.verifying = true;
                state.login.error = None;
                Task::perform(verification_delay(), |_| Message::CredentialsChecked)
            }
            Message::CredentialsChecked => {
                state.login.verifying = false;
                match state
                    .auth
                    .login(&state.login.username, &state.login.password)
                {
                    Ok(session) => {
                        let mut console = Console::boot(session.username.clone());
                        console.push_notice(Notice::info(
                            "Login successful",
                            format!("Welcome back, {}", console.username),
                        ));
                        state.console = Some(console);
                        state.login = LoginForm::default();
                    }
                    Err(err) => {
                        state.login.error = Some(err.to_string());
                    }
                }
                Task::none()
            }
            Message::Logout => {
                state.auth.logout();
                state.console = None;
                state.login = LoginForm::default();
                Task::none()
            }
            Message::SweepFrame => {
                if let Some(console) = &mut state.console {
                    console
                        .engine
                        .set_enabled(console.machine.phase() == SonarPhase::Active);
                    let now = Instant::now();
                    match console.engine.tick(now) {
                        SweepTick::Idle => {}
                        SweepTick::Advanced(angle) => {
                            let distance = console.echo.sample(angle);
                            console.tracker.observe(angle, distance, now);
                        }
                        SweepTick::CycleComplete => {
                            ring_quietly(&LogChime);
                            let distance = console.echo.sample(0);
                            console.tracker.observe(0, distance, now);
                        }
                    }
                    console.tracker.expire(now);
                }
                Task::none()
            }
            Message::WeatherRefresh => {
                if let Some(console) = &mut state.console {
                    console.weather = console.weather_station.sample();
                }
                Task::none()
            }
            Message::DiagnosticsPulse => {
                if let Some(console) = &mut state.console {
                    console.diagnostics_reading = console.diagnostics.tick();
                }
                Task::none()
            }
            Message::SonarTogglePressed => {
                let Some(console) = &mut state.console else {
                    return Task::none();
                };
                match console.machine.phase() {
                    SonarPhase::Standby => {
                        if console.machine.needs_confirmation() {
                            console.pending = Some(PendingConfirm::SonarActivation);
                            Task::none()
                        } else {
                            begin_activation(console)
                        }
                    }
                    SonarPhase::Active => {
                        let machine = console.machine.clone();
                        Task::perform(
                            async move { machine.deactivate().await },
                            Message::SonarSettled,
                        )
                    }
                    SonarPhase::Initializing | SonarPhase::Deactivating => Task::none(),
                }
            }
            Message::SafetyConfirmed => {
                let Some(console) = &mut state.console else {
                    return Task::none();
                };
                console.pending = None;
                if console.dont_ask_again {
                    console.machine.disable_safety_warning();
                }
                begin_activation(console)
            }
            Message::SafetyCancelled => {
                if let Some(console) = &mut state.console {
                    console.pending = None;
                }
                Task::none()
            }
            Message::DontAskAgainToggled(checked) => {
                if let Some(console) = &mut state.console {
                    console.dont_ask_again = checked;
                }
                Task::none()
            }
            Message::SonarSettled(result) => {
                if let Some(console) = &mut state.console {
                    match result {
                        Ok(()) => {
                            let phase = console.machine.phase();
                            for change in console.panel.apply_sonar_phase(phase) {
                                console.push_notice(toggle_notice(
                                    &change.name,
                                    change.is_active,
                                ));
                            }
                            let settled = match phase {
                                SonarPhase::Active => {
                                    Notice::info("Sonar activated", "System is now operational")
                                }
                                _ => Notice::info(
                                    "Sonar deactivated",
                                    "System is now in standby mode",
                                ),
                            };
                            console.push_notice(settled);
                        }
                        Err(rejected) => {
                            console.push_notice(Notice::destructive(
                                "Sonar busy",
                                rejected.to_string(),
                            ));
                        }
                    }
                }
                Task::none()
            }
            Message::ControlPressed(id) => {
                if let Some(console) = &mut state.console {
                    let phase = console.machine.phase();
                    match console.panel.toggle(id, phase) {
                        Ok(ToggleOutcome::Applied {
                            name, is_active, ..
                        }) => {
                            console.push_notice(toggle_notice(&name, is_active));
                        }
                        Ok(ToggleOutcome::ConfirmationRequired { id, name }) => {
                            console.pending =
                                Some(PendingConfirm::ControlShutdown { id, name });
                        }
                        Err(ToggleError::LockedBySonar { name }) => {
                            console.push_notice(Notice::destructive(
                                "Control locked",
                                format!(
                                    "{name} cannot be switched off while the sonar is active"
                                ),
                            ));
                        }
                        Err(err) => log::warn!("toggle refused: {err}"),
                    }
                }
                Task::none()
            }
            Message::ControlShutdownConfirmed => {
                if let Some(console) = &mut state.console {
                    if let Some(PendingConfirm::ControlShutdown { id, .. }) =
                        console.pending.take()
                    {
                        let phase = console.machine.phase();
                        match console.panel.confirm_toggle(id, phase) {
                            Ok(ToggleOutcome::Applied {
                                name, is_active, ..
                            }) => console.push_notice(toggle_notice(&name, is_active)),
                            Ok(_) => {}
                            Err(ToggleError::LockedBySonar { name }) => {
                                console.push_notice(Notice::destructive(
                                    "Control locked",
                                    format!(
                                        "{name} cannot be switched off while the sonar is active"
                                    ),
                                ));
                            }
                            Err(err) => log::warn!("confirmed toggle refused: {err}"),
                        }
                    }
                }
                Task::none()
            }
            Message::ControlShutdownCancelled => {
                if let Some(console) = &mut state.console {
                    console.pending = None;
                }
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        match &state.console {
            Some(console) => console_view(console),
            None => login_view(&state.login),
        }
    }
}

fn begin_activation(console: &mut Console) -> Task<Message> {
    console.push_notice(Notice::info(
        "Activating sonar...",
        "Please wait while the system initializes",
    ));
    let machine = console.machine.clone();
    Task::perform(async move { machine.activate().await }, Message::SonarSettled)
}

async fn verification_delay() {
    tokio::time::sleep(Duration::from_millis(800)).await;
}

fn toggle_notice(name: &str, is_active: bool) -> Notice {
    let verb = if is_active { "Activated" } else { "Deactivated" };
    let state = if is_active { "ON" } else { "OFF" };
    let title = format!("{name} {verb}");
    let description = format!("The {} is now {state}", name.to_lowercase());
    if is_active {
        Notice::info(title, description)
    } else {
        Notice::destructive(title, description)
    }
}

fn login_view(login: &LoginForm) -> Element<'_, Message> {
    let mut form = column![
        text("Nexus Console").size(30),
        text("Authentication Required").size(16),
        text("Enter your credentials to access the dashboard").size(12),
        text_input("Username", &login.username)
            .on_input(|value| Message::LoginFieldChanged(LoginField::Username, value))
            .padding(6),
        text_input("Password", &login.password)
            .secure(true)
            .on_input(|value| Message::LoginFieldChanged(LoginField::Password, value))
            .padding(6),
    ]
    .spacing(10)
    .padding(16)
    .width(Length::Fixed(360.0));

    if let Some(error) = &login.error {
        form = form.push(text(error).size(14));
    }
    form = form.push(text("Note: use Admin / Aa123456 to log in").size(12));
    form = form.push(
        button(if login.verifying {
            "Authenticating..."
        } else {
            "Login"
        })
        .on_press_maybe((!login.verifying).then_some(Message::SubmitLogin))
        .padding(10),
    );

    Container::new(form)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn console_view(console: &Console) -> Element<'_, Message> {
    let header = row![
        text("Nexus Console").size(24),
        text(format!("Operator: {}", console.username)).size(14),
        button("Logout").on_press(Message::Logout).padding(6),
    ]
    .spacing(20)
    .align_y(Alignment::Center);

    let layout = row![
        sonar_card(console),
        column![weather_card(&console.weather), diagnostics_card(&console.diagnostics_reading)]
            .spacing(16)
            .width(Length::Fixed(280.0)),
        column![control_card(console), notice_feed(&console.notices)]
            .spacing(16)
            .width(Length::Fill),
    ]
    .spacing(20)
    .align_y(Alignment::Start);

    Container::new(column![header, layout].spacing(16).padding(20))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn sonar_card(console: &Console) -> Element<'_, Message> {
    let phase = console.machine.phase();
    let toggle_label = if phase == SonarPhase::Active { "ON" } else { "OFF" };

    let scope = Canvas::new(SonarScope {
        angle: console.engine.angle(),
        active: phase == SonarPhase::Active,
        points: console
            .tracker
            .points()
            .iter()
            .map(|point| (point.x, point.y))
            .collect(),
    })
    .width(Length::Fixed(320.0))
    .height(Length::Fixed(320.0));

    let mut card = column![
        row![
            text("Proximity Sonar").size(20),
            text(phase.label()).size(14),
            button(toggle_label)
                .on_press_maybe(
                    (!phase.is_transitional()).then_some(Message::SonarTogglePressed)
                )
                .padding(6),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        scope,
        row![text("0°").size(12), text("90°").size(12), text("180°").size(12)].spacing(130),
    ]
    .spacing(10)
    .width(Length::Fixed(340.0));

    if let Some(pending) = &console.pending {
        card = card.push(confirm_panel(pending, console.dont_ask_again));
    }

    card.into()
}

fn confirm_panel(pending: &PendingConfirm, dont_ask: bool) -> Element<'_, Message> {
    match pending {
        PendingConfirm::SonarActivation => column![
            text("Activate Sonar System").size(16),
            text(
                "This action will automatically turn on the cooling fan and the \
                 transducer. Do you want to proceed?"
            )
            .size(12),
            checkbox(dont_ask)
                .label("Don't show this warning again this session")
                .on_toggle(Message::DontAskAgainToggled),
            row![
                button("Cancel").on_press(Message::SafetyCancelled).padding(6),
                button("Confirm").on_press(Message::SafetyConfirmed).padding(6),
            ]
            .spacing(10),
        ]
        .spacing(8)
        .padding(10)
        .into(),
        PendingConfirm::ControlShutdown { name, .. } => column![
            text(format!("Turn off {name}?")).size(16),
            text(format!(
                "The {} is slaved to the sonar. Do you want to switch it off?",
                name.to_lowercase()
            ))
            .size(12),
            row![
                button("Cancel")
                    .on_press(Message::ControlShutdownCancelled)
                    .padding(6),
                button("Confirm")
                    .on_press(Message::ControlShutdownConfirmed)
                    .padding(6),
            ]
            .spacing(10),
        ]
        .spacing(8)
        .padding(10)
        .into(),
    }
}

fn weather_card(weather: &WeatherReading) -> Element<'static, Message> {
    column![
        text("Weather Station").size(20),
        row![
            stat("Temperature", format!("{:.1} °C", weather.temperature)),
            stat("Humidity", format!("{:.1} %", weather.humidity)),
        ]
        .spacing(16),
        row![
            stat("Pressure", format!("{:.1} hPa", weather.pressure)),
            stat("Light", format!("{} lux", weather.light)),
        ]
        .spacing(16),
    ]
    .spacing(10)
    .into()
}

fn stat(label: &'static str, value: String) -> Element<'static, Message> {
    column![text(value).size(22), text(label).size(11)]
        .spacing(2)
        .into()
}

fn diagnostics_card(reading: &DiagnosticsReading) -> Element<'static, Message> {
    column![
        text("System Diagnostics").size(20),
        row![
            text("System Voltage").size(13).width(Length::Fixed(120.0)),
            text(format!("{:.1}V", reading.voltage)).size(13),
        ]
        .spacing(10),
        row![
            text("Uptime").size(13).width(Length::Fixed(120.0)),
            text(format_uptime(reading.uptime_secs)).size(13),
        ]
        .spacing(10),
        row![
            text("Baud Rate").size(13).width(Length::Fixed(120.0)),
            text(reading.baud_rate.to_string()).size(13),
        ]
        .spacing(10),
    ]
    .spacing(8)
    .into()
}

fn control_card(console: &Console) -> Element<'_, Message> {
    let mut rows = Column::new().spacing(8).push(text("Control Panel").size(20));
    for control in console.panel.controls() {
        let state_label = if control.is_active { "ON" } else { "OFF" };
        let action = if control.is_active { "Turn off" } else { "Turn on" };
        rows = rows.push(
            row![
                text(&control.name).size(14).width(Length::Fixed(110.0)),
                text(state_label).size(13).width(Length::Fixed(40.0)),
                button(text(action).size(12))
                    .on_press(Message::ControlPressed(control.id))
                    .padding(6),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        );
    }
    rows.into()
}

fn notice_feed(notices: &[Notice]) -> Element<'_, Message> {
    let feed = if notices.is_empty() {
        Column::new().push(text("No activity yet").size(12))
    } else {
        notices
            .iter()
            .rev()
            .fold(Column::new().spacing(4), |col, notice| {
                let marker = match notice.severity {
                    Severity::Destructive => "[!] ",
                    Severity::Default => "",
                };
                col.push(
                    text(format!("{marker}{}: {}", notice.title, notice.description)).size(12),
                )
            })
    };

    column![
        text("Activity log").size(16),
        Container::new(scrollable(feed).height(Length::Fixed(180.0))).padding(6),
    ]
    .spacing(6)
    .into()
}

struct SonarScope {
    angle: u16,
    active: bool,
    points: Vec<(f32, f32)>,
}

impl canvas::Program<Message> for SonarScope {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.02, 0.03, 0.04),
        );

        let side = bounds.width.min(bounds.height);
        let anchor = Point::new(side / 2.0, side);
        let radius = side / 2.0;

        for ring in 1..=4 {
            let ring_radius = radius * (ring as f32 / 4.0);
            let ring_path = Path::new(|builder| builder.circle(anchor, ring_radius));
            frame.stroke(
                &ring_path,
                Stroke::default().with_color(Color::from_rgb(0.16, 0.22, 0.24)),
            );
        }

        let spokes = Path::new(|builder| {
            for spoke_deg in (0..=180).step_by(30) {
                let (dx, dy) = scope_direction(spoke_deg as f32);
                builder.move_to(anchor);
                builder.line_to(Point::new(
                    anchor.x + dx * radius,
                    anchor.y + dy * radius,
                ));
            }
        });
        frame.stroke(
            &spokes,
            Stroke::default()
                .with_color(Color::from_rgb(0.16, 0.22, 0.24))
                .with_width(1.0),
        );

        if self.active {
            let (dx, dy) = scope_direction(self.angle as f32);
            let sweep = Path::new(|builder| {
                builder.move_to(anchor);
                builder.line_to(Point::new(
                    anchor.x + dx * radius,
                    anchor.y + dy * radius,
                ));
            });
            frame.stroke(
                &sweep,
                Stroke::default()
                    .with_width(2.5)
                    .with_color(Color::from_rgb(0.22, 0.85, 0.45)),
            );
        }

        for (x, y) in &self.points {
            let marker =
                Path::new(|builder| builder.circle(Point::new(x * side, y * side), 3.0));
            frame.fill(&marker, Color::from_rgb(0.22, 0.85, 0.45));
        }

        vec![frame.into_geometry()]
    }
}

/// Unit direction of a sweep spoke: angle 0 points left along the baseline,
/// 90 straight up, 180 right.
fn scope_direction(angle_deg: f32) -> (f32, f32) {
    let beta = (angle_deg - 90.0) * PI / 180.0;
    (beta.sin(), -beta.cos())
}
