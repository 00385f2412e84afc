//! Game flow controller.
//!
//! Menus form a stack of [`Screen`]s. Each screen offers a fixed list of
//! [`Action`]s; performing one yields a [`Transition`] that the controller
//! applies to the stack and to the [`SessionState`]. Nothing here recurses,
//! so the depth of a session is bounded by the number of screens.

use chrono::{Local, NaiveDate};
use log::debug;

use crate::console::{InputError, InputOutput};
use crate::domain::GameId;
use crate::service::{BullsCowsService, ServiceError};
use crate::session::{SessionError, SessionState};
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    Games,
    Play,
}

impl Screen {
    pub fn actions(self) -> &'static [Action] {
        match self {
            Screen::Main => &[Action::Login, Action::Register, Action::CloseConnection],
            Screen::Games => &[
                Action::CreateGame,
                Action::StartGame,
                Action::ContinueGame,
                Action::JoinGame,
                Action::ShowNotStartedGames,
                Action::Back,
            ],
            Screen::Play => &[Action::Guess, Action::Back],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Register,
    CloseConnection,
    CreateGame,
    StartGame,
    ContinueGame,
    JoinGame,
    ShowNotStartedGames,
    Guess,
    Back,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Login => "Login",
            Action::Register => "Register",
            Action::CloseConnection => "Exit & Close connection",
            Action::CreateGame => "Create game",
            Action::StartGame => "Start game",
            Action::ContinueGame => "Continue game",
            Action::JoinGame => "Join game",
            Action::ShowNotStartedGames => "Show all not started games",
            Action::Guess => "Guess sequence",
            Action::Back => "Exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Push(Screen),
    Pop,
    Exit,
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

pub struct GameFlow<S: BullsCowsService, IO: InputOutput> {
    service: S,
    io: IO,
    session: SessionState,
    stack: Vec<Screen>,
    today: Option<NaiveDate>,
}

impl<S: BullsCowsService, IO: InputOutput> GameFlow<S, IO> {
    /// Fetch the server defaults once and open the main menu.
    pub async fn start(mut service: S, io: IO) -> Result<Self, ServiceError> {
        let defaults = service.get_game_defaults().await?;
        debug!("game defaults: {:?}", defaults);
        Ok(Self::new(service, io, SessionState::new(defaults)))
    }

    pub fn new(service: S, io: IO, session: SessionState) -> Self {
        Self {
            service,
            io,
            session,
            stack: vec![Screen::Main],
            today: None,
        }
    }

    /// Pin the date used for age checks.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn screen(&self) -> Option<Screen> {
        self.stack.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    pub fn io(&self) -> &IO {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    pub fn into_parts(self) -> (S, IO, SessionState) {
        (self.service, self.io, self.session)
    }

    /// Drive menus until the gamer exits or input ends.
    ///
    /// Returns an error only when the connection is lost; every other
    /// failure is shown and the current menu is offered again.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        while let Some(screen) = self.screen() {
            let action = match self.choose(screen) {
                Ok(action) => action,
                Err(InputError::Closed) => break,
                Err(InputError::AttemptsExhausted(_)) => continue,
            };
            debug!("{:?}: {:?}", screen, action);
            let transition = match self.perform(action).await {
                Ok(transition) => transition,
                Err(e) => self.recover(e)?,
            };
            self.apply(transition)?;
        }
        Ok(())
    }

    fn title(&self, screen: Screen) -> String {
        match screen {
            Screen::Main => "Bulls and Cows Network Game".to_string(),
            Screen::Games => format!(
                "Game menu. Gamer: {}",
                self.session.username().unwrap_or_default()
            ),
            Screen::Play => format!(
                "Game {}: guess sequence of {} digits",
                self.session.game_id().unwrap_or_default(),
                self.session.sequence_length().unwrap_or_default()
            ),
        }
    }

    fn choose(&mut self, screen: Screen) -> Result<Action, InputError> {
        let actions = screen.actions();
        let title = self.title(screen);
        self.io.write_line(&title);
        for (i, action) in actions.iter().enumerate() {
            self.io.write_line(&format!("{}. {}", i + 1, action.label()));
        }
        let index = self.io.read_object("Select item:", "Wrong item number.", |line| {
            validation::parse_menu_choice(line, actions.len())
        })?;
        Ok(actions[index])
    }

    fn recover(&mut self, error: FlowError) -> anyhow::Result<Transition> {
        match error {
            FlowError::Input(InputError::Closed) => Ok(Transition::Exit),
            FlowError::Input(e @ InputError::AttemptsExhausted(_)) => {
                self.io.write_line(&format!("{}. Back to the menu.", e));
                Ok(Transition::Stay)
            }
            FlowError::Service(e) if e.is_fatal() => Err(e.into()),
            FlowError::Service(e) => {
                self.io.write_line(&e.to_string());
                Ok(Transition::Stay)
            }
            FlowError::Session(e) => Err(e.into()),
        }
    }

    /// Apply a transition to the screen stack, updating the session on the way out of a screen.
    pub fn apply(&mut self, transition: Transition) -> Result<(), SessionError> {
        match transition {
            Transition::Stay => {}
            Transition::Push(screen) => self.stack.push(screen),
            Transition::Pop => match self.stack.pop() {
                Some(Screen::Play) => self.session.leave_game()?,
                Some(Screen::Games) => self.session.logout()?,
                Some(Screen::Main) | None => {}
            },
            Transition::Exit => self.stack.clear(),
        }
        Ok(())
    }

    pub async fn perform(&mut self, action: Action) -> Result<Transition, FlowError> {
        match action {
            Action::Login => self.login().await,
            Action::Register => self.register().await,
            Action::CloseConnection => Ok(Transition::Exit),
            Action::CreateGame => self.create_game().await,
            Action::StartGame => self.start_game().await,
            Action::ContinueGame => self.continue_game().await,
            Action::JoinGame => self.join_game().await,
            Action::ShowNotStartedGames => self.show_not_started_games().await,
            Action::Guess => self.guess().await,
            Action::Back => Ok(Transition::Pop),
        }
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn username(&self) -> Result<String, SessionError> {
        self.session
            .username()
            .map(str::to_string)
            .ok_or(SessionError::NotAuthenticated)
    }

    async fn login(&mut self) -> Result<Transition, FlowError> {
        let mut username = self.io.read_object(
            "Enter username:",
            "Invalid username. Please try again.",
            validation::parse_username,
        )?;
        match self.service.login_gamer(&username).await {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                self.io.write_line(&e.to_string());
                match self.gamer_or_register().await? {
                    Some(name) => username = name,
                    None => return Ok(Transition::Stay),
                }
            }
        }
        self.session.authenticate(&username)?;
        Ok(Transition::Push(Screen::Games))
    }

    async fn register(&mut self) -> Result<Transition, FlowError> {
        match self.register_gamer(String::new()).await? {
            Some(username) => {
                self.session.authenticate(&username)?;
                Ok(Transition::Push(Screen::Games))
            }
            None => Ok(Transition::Stay),
        }
    }

    /// Offer the known gamers; an unlisted or empty answer leads to registration.
    async fn gamer_or_register(&mut self) -> Result<Option<String>, FlowError> {
        let gamers = match self.service.get_all_gamers().await {
            Ok(gamers) => gamers,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                self.io.write_line(&e.to_string());
                return self.register_gamer(String::new()).await;
            }
        };
        self.io.write_line("List of all registered gamers:");
        for gamer in &gamers {
            self.io.write_line(gamer);
        }
        let chosen = self
            .io
            .read_string("Select existing gamer username from the list or enter a new one:")?
            .trim()
            .to_string();
        if !chosen.is_empty() && gamers.contains(&chosen) {
            return Ok(Some(chosen));
        }
        self.register_gamer(chosen).await
    }

    /// Register `username` (prompting for one if empty). `None` if the server refused.
    async fn register_gamer(&mut self, username: String) -> Result<Option<String>, FlowError> {
        let username = if username.is_empty() {
            self.io.read_object(
                "Enter new gamer username:",
                "Invalid username. Please try again.",
                validation::parse_username,
            )?
        } else {
            username
        };
        let today = self.today();
        let min_age = self.session.defaults().min_age;
        let birth_date = self.io.read_object(
            &format!(
                "Enter birthdate in format yyyy-MM-dd (gamer must be at least {} years old):",
                min_age
            ),
            "Incorrect date or format entered. Please try again.",
            |line| validation::parse_birth_date(line, today, min_age),
        )?;
        match self.service.register_gamer(&username, birth_date).await {
            Ok(()) => {
                self.io
                    .write_line(&format!("Gamer \"{}\" registered successfully.", username));
                Ok(Some(username))
            }
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                self.io.write_line(&e.to_string());
                Ok(None)
            }
        }
    }

    async fn create_game(&mut self) -> Result<Transition, FlowError> {
        let defaults = *self.session.defaults();
        let length = self.io.read_object(
            &format!(
                "Enter sequence length ({} - {}) or 0 for default value of {} digits:",
                defaults.min_seq_len, defaults.max_seq_len, defaults.def_seq_len
            ),
            "Incorrect data entered.",
            |line| validation::parse_sequence_length(line, &defaults),
        )?;
        let game_id = self.service.create_game(length).await?;
        self.io
            .write_line(&format!("Game with id \"{}\" successfully created.", game_id));
        self.session.select_game(game_id)?;
        Ok(Transition::Stay)
    }

    /// Show `candidates` and let the gamer pick one of them. `None` if there is nothing to pick.
    fn pick_game(
        &mut self,
        title: &str,
        candidates: &[GameId],
    ) -> Result<Option<GameId>, FlowError> {
        self.io.write_line(title);
        if candidates.is_empty() {
            self.io.write_line("No games available.");
            return Ok(None);
        }
        for id in candidates {
            self.io.write_line(&id.to_string());
        }
        let game_id = self.io.read_object(
            "Select game ID:",
            "Invalid game ID. Please select game ID from the list again.",
            |line| validation::parse_game_pick(line, candidates),
        )?;
        Ok(Some(game_id))
    }

    async fn start_game(&mut self) -> Result<Transition, FlowError> {
        let username = self.username()?;
        let candidates = self
            .service
            .get_not_started_games_with_gamer(&username)
            .await?;
        let title = format!(
            "List of all not started games where gamer \"{}\" joined:",
            username
        );
        let Some(game_id) = self.pick_game(&title, &candidates)? else {
            return Ok(Transition::Stay);
        };
        let gamers = self.service.start_game(game_id).await?;
        self.enter_game(game_id, &gamers).await
    }

    async fn continue_game(&mut self) -> Result<Transition, FlowError> {
        let username = self.username()?;
        let candidates = self.service.get_started_games_with_gamer(&username).await?;
        let title = format!("List of all started games where gamer \"{}\" joined:", username);
        let Some(game_id) = self.pick_game(&title, &candidates)? else {
            return Ok(Transition::Stay);
        };
        let gamers = self.service.get_game_gamers(game_id).await?;
        self.enter_game(game_id, &gamers).await
    }

    async fn enter_game(
        &mut self,
        game_id: GameId,
        gamers: &[String],
    ) -> Result<Transition, FlowError> {
        self.io
            .write_line(&format!("The list of gamers in game \"{}\":", game_id));
        for gamer in gamers {
            self.io.write_line(gamer);
        }
        let length = self.service.get_game_sequence_length(game_id).await?;
        self.session.select_game(game_id)?;
        self.session.begin_play(length)?;
        Ok(Transition::Push(Screen::Play))
    }

    async fn join_game(&mut self) -> Result<Transition, FlowError> {
        let username = self.username()?;
        let candidates = self
            .service
            .get_not_started_games_with_no_gamer(&username)
            .await?;
        let title = format!(
            "List of all not started games where gamer \"{}\" not joined:",
            username
        );
        let Some(game_id) = self.pick_game(&title, &candidates)? else {
            return Ok(Transition::Stay);
        };
        self.service.gamer_join_game(game_id, &username).await?;
        self.io
            .write_line(&format!("Gamer \"{}\" joined game \"{}\"", username, game_id));
        self.session.select_game(game_id)?;
        Ok(Transition::Stay)
    }

    async fn show_not_started_games(&mut self) -> Result<Transition, FlowError> {
        let games = self.service.get_not_started_games().await?;
        self.io.write_line("List of all not started games IDs:");
        if games.is_empty() {
            self.io.write_line("No games available.");
        }
        for id in games {
            self.io.write_line(&id.to_string());
        }
        Ok(Transition::Stay)
    }

    async fn guess(&mut self) -> Result<Transition, FlowError> {
        let username = self.username()?;
        let (game_id, length) = match (self.session.game_id(), self.session.sequence_length()) {
            (Some(id), Some(length)) => (id, length),
            _ => return Err(SessionError::NoGameInProgress.into()),
        };
        let guess = self.io.read_object(
            &format!("Enter {} non-repeated digits:", length),
            "Incorrect guess. Please try again.",
            |line| validation::parse_guess(line, length),
        )?;
        let history = match self.service.move_processing(&guess, game_id, &username).await {
            Ok(history) => history,
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                // Someone else may have finished the game since the last guess.
                if self.service.game_over(game_id).await? {
                    return self.finish_game(game_id, false);
                }
                return Err(e.into());
            }
        };
        for mv in &history {
            self.io.write_line(&mv.to_string());
        }
        if !self.service.game_over(game_id).await? {
            return Ok(Transition::Stay);
        }
        let won = history.last().is_some_and(|mv| mv.bulls == length);
        self.finish_game(game_id, won)
    }

    fn finish_game(&mut self, game_id: GameId, won: bool) -> Result<Transition, FlowError> {
        if won {
            self.io.write_line("Congratulations! You are the winner!");
        } else {
            self.io.write_line(&format!("Game {} is over.", game_id));
        }
        self.session.record_win()?;
        Ok(Transition::Pop)
    }
}
