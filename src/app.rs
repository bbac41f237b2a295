use std::path::PathBuf;
use tracing::debug;

use crate::auth::CredentialVerifier;
use crate::data::schema::FieldKind;
use crate::model::Classifier;
use crate::prediction::run_prediction_view;
use crate::session::{MenuItem, Session};
use crate::utils::input::Console;
use crate::utils::io::Artifacts;

pub const APP_TITLE: &str = "Sleep Disorder Prediction";
pub const LOGIN_FAILED: &str = "Login failed!";

/// Result of one shell interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(Session),
    /// Input closed or the user quit; carries the state at exit.
    Exit(Session),
}

/// Login gate plus the four-item menu over the loaded artifacts.
pub struct App<V> {
    artifacts: Artifacts,
    verifier: V,
    report_dir: PathBuf,
}

impl<V: CredentialVerifier> App<V> {
    pub fn new(artifacts: Artifacts, verifier: V, report_dir: impl Into<PathBuf>) -> Self {
        App {
            artifacts,
            verifier,
            report_dir: report_dir.into(),
        }
    }

    /// Runs the shell until input closes or the user quits from the login form.
    pub fn run<C: Console + ?Sized>(&self, console: &mut C) -> anyhow::Result<Session> {
        let mut session = Session::default();
        loop {
            match self.step(console, session)? {
                Flow::Continue(next) => session = next,
                Flow::Exit(last) => return Ok(last),
            }
        }
    }

    pub fn step<C: Console + ?Sized>(
        &self,
        console: &mut C,
        session: Session,
    ) -> anyhow::Result<Flow> {
        if !session.is_logged_in() {
            return self.login_form(console, session);
        }

        console.print("")?;
        console.print("== Main Menu ==")?;
        for (i, item) in MenuItem::ALL.iter().enumerate() {
            console.print(&format!("  {}) {}", i + 1, item))?;
        }
        let Some(answer) = console.read_line("Select: ")? else {
            return Ok(Flow::Exit(session));
        };
        match answer.parse::<MenuItem>() {
            Ok(item) => self.dispatch(console, session, item),
            Err(msg) => {
                console.print(&msg)?;
                Ok(Flow::Continue(session))
            }
        }
    }

    /// Renders one menu destination; only Logout changes the session.
    pub fn dispatch<C: Console + ?Sized>(
        &self,
        console: &mut C,
        session: Session,
        item: MenuItem,
    ) -> anyhow::Result<Flow> {
        debug!(%item, "menu selected");
        match item {
            MenuItem::Home => self.home(console)?,
            MenuItem::Prediction => {
                if !run_prediction_view(console, &self.artifacts, &self.report_dir)? {
                    return Ok(Flow::Exit(session));
                }
            }
            MenuItem::About => self.about(console)?,
            MenuItem::Logout => {
                console.print("Logged out.")?;
                return Ok(Flow::Continue(session.logout()));
            }
        }
        Ok(Flow::Continue(session))
    }

    fn login_form<C: Console + ?Sized>(
        &self,
        console: &mut C,
        session: Session,
    ) -> anyhow::Result<Flow> {
        console.print("")?;
        console.print("== User Login ==")?;
        let Some(username) = console.read_line("Username (or 'quit'): ")? else {
            return Ok(Flow::Exit(session));
        };
        if username.trim().eq_ignore_ascii_case("quit") {
            return Ok(Flow::Exit(session));
        }
        let Some(password) = console.read_secret("Password: ")? else {
            return Ok(Flow::Exit(session));
        };

        match session.login(&self.verifier, &username, &password) {
            Ok(next) => {
                console.print(&format!("Welcome, {}.", username))?;
                Ok(Flow::Continue(next))
            }
            Err(same) => {
                console.print(LOGIN_FAILED)?;
                Ok(Flow::Continue(same))
            }
        }
    }

    fn home<C: Console + ?Sized>(&self, console: &mut C) -> anyhow::Result<()> {
        console.print(&format!("== {} ==", APP_TITLE))?;
        console.print("Predicts sleep disorders from lifestyle and health data.")?;
        Ok(())
    }

    fn about<C: Console + ?Sized>(&self, console: &mut C) -> anyhow::Result<()> {
        let categorical: Vec<_> = self
            .artifacts
            .schema
            .fields(&self.artifacts.encoders)
            .into_iter()
            .filter(|f| matches!(f.kind, FieldKind::Choice(_)))
            .map(|f| f.name)
            .collect();

        console.print("== About ==")?;
        console.print("Built on an ensemble classifier (random forest and boosted trees).")?;
        console.print("The model was trained offline and is loaded here as-is.")?;
        console.print(&format!("Model: {}", self.artifacts.model.kind()))?;
        console.print(&format!(
            "Features: {} ({} classes)",
            self.artifacts.schema.width(),
            self.artifacts.model.n_classes()
        ))?;
        console.print(&format!("Categorical: {}", categorical.join(", ")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentials;
    use crate::data::encoder::LabelEncoders;
    use crate::data::schema::FeatureSchema;
    use crate::model::forest::{RandomForest, TreeNode};
    use crate::model::ModelArtifact;
    use crate::utils::input::LineConsole;
    use std::path::Path;

    fn app(dir: &Path) -> App<StaticCredentials> {
        let artifacts = Artifacts::new(
            ModelArtifact::RandomForest(
                RandomForest::new(1, 2, vec![TreeNode::leaf(0)]).unwrap(),
            ),
            LabelEncoders::new(),
            FeatureSchema::new(["Age"]),
        )
        .unwrap();
        App::new(artifacts, StaticCredentials::default(), dir)
    }

    fn run(app: &App<StaticCredentials>, script: &str) -> (Session, String) {
        let mut console = LineConsole::new(script.as_bytes(), Vec::new());
        let session = app.run(&mut console).unwrap();
        (session, String::from_utf8(console.into_writer()).unwrap())
    }

    #[test]
    fn wrong_password_stays_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let (session, out) = run(&app(dir.path()), "admin\nnope\n");
        assert_eq!(session, Session::LoggedOut);
        assert!(out.contains(LOGIN_FAILED));
        assert!(!out.contains("Main Menu"));
    }

    #[test]
    fn login_then_logout() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (session, out) = run(&app, "admin\n1234\n");
        assert!(session.is_logged_in());
        assert!(out.contains("Main Menu"));

        let (session, out) = run(&app, "admin\n1234\n1\n3\n4\n");
        assert_eq!(session, Session::LoggedOut);
        assert!(out.contains(APP_TITLE));
        assert!(out.contains("Model: random forest"));
        assert!(out.contains("Logged out."));
    }

    #[test]
    fn padded_credentials_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        for script in ["  admin \n1234\n", "admin\n 1234  \n"] {
            let (session, out) = run(&app, script);
            assert_eq!(session, Session::LoggedOut);
            assert!(out.contains(LOGIN_FAILED));
        }
    }

    #[test]
    fn quit_from_login_form() {
        let dir = tempfile::tempdir().unwrap();
        let (session, _) = run(&app(dir.path()), "quit\nadmin\n1234\n");
        assert_eq!(session, Session::LoggedOut);
    }

    #[test]
    fn unknown_menu_entry_keeps_session() {
        let dir = tempfile::tempdir().unwrap();
        let (session, out) = run(&app(dir.path()), "admin\n1234\n9\n");
        assert!(session.is_logged_in());
        assert!(out.contains("no menu entry 9"));
    }
}
