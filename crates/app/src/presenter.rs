//! Line-based terminal front end for the quiz.
//!
//! Reads choices from any `BufRead` and renders to any `Write`, so a session
//! can be scripted in tests.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use quiz_core::model::{ResultSummary, Subject, Unit};
use services::{
    AnswerOutcome, LiveStats, LoopAdvance, QuestionView, QuizSession, SessionError,
    SessionLoopService,
};

/// What the player picked on a menu.
enum Pick<T> {
    Item(T),
    Back,
    Quit,
}

/// What to do after the result screen.
enum AfterResult {
    Retry,
    Units,
    Quit,
}

/// Where to go once a unit is left.
enum UnitExit {
    Units,
    Quit,
}

pub struct Presenter<R, W> {
    input: R,
    output: W,
    service: SessionLoopService,
    feedback_pause: Duration,
}

impl<R: BufRead, W: Write> Presenter<R, W> {
    pub fn new(input: R, output: W, service: SessionLoopService, feedback_pause: Duration) -> Self {
        Self {
            input,
            output,
            service,
            feedback_pause,
        }
    }

    /// Run menus and sessions until the player quits or input ends.
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let high_score = self.service.high_score().await?;
        writeln!(self.output, "=== Study Quiz ===  High score: {high_score}")?;

        let subjects = self.service.catalog().subjects().to_vec();
        loop {
            let subject = match self.pick_subject(&subjects)? {
                Pick::Item(subject) => subject,
                Pick::Back | Pick::Quit => return Ok(()),
            };
            loop {
                let unit = match self.pick_unit(subject)? {
                    Pick::Item(unit) => unit,
                    Pick::Back => break,
                    Pick::Quit => return Ok(()),
                };
                if let UnitExit::Quit = self.play_unit(subject, unit).await? {
                    return Ok(());
                }
            }
        }
    }

    async fn play_unit(
        &mut self,
        subject: &Subject,
        unit: &Unit,
    ) -> Result<UnitExit, Box<dyn std::error::Error>> {
        let mut session = match self.service.start_session(subject.id(), unit.id()).await {
            Ok(session) => session,
            Err(err) => {
                writeln!(self.output, "Could not load the questions: {err}")?;
                return Ok(UnitExit::Units);
            }
        };

        loop {
            if !self.play_session(&mut session).await? {
                return Ok(UnitExit::Quit);
            }
            match self.after_result()? {
                AfterResult::Retry => {
                    if let Err(err) = self.service.restart(&mut session).await {
                        writeln!(self.output, "Could not load the questions: {err}")?;
                        return Ok(UnitExit::Units);
                    }
                }
                AfterResult::Units => return Ok(UnitExit::Units),
                AfterResult::Quit => return Ok(UnitExit::Quit),
            }
        }
    }

    /// Returns false if the player quit mid-session.
    async fn play_session(
        &mut self,
        session: &mut QuizSession,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        let Some(mut view) = session.current_question() else {
            return Ok(false);
        };
        loop {
            self.render_question(&view, &session.stats())?;
            let Some(choice) = self.read_choice(view.choices.len())? else {
                writeln!(self.output, "Quitting the game.")?;
                return Ok(false);
            };

            let outcome = match self.service.answer(session, choice) {
                Ok(outcome) => outcome,
                Err(SessionError::InvalidChoice { .. }) => continue,
                Err(err) => return Err(err.into()),
            };
            self.render_outcome(&outcome, &view)?;
            if !self.feedback_pause.is_zero() {
                tokio::time::sleep(self.feedback_pause).await;
            }

            match self.service.advance(session).await? {
                LoopAdvance::Next(next) => view = next,
                LoopAdvance::Finished {
                    summary,
                    high_score,
                    is_new_record,
                } => {
                    self.render_summary(&summary, high_score, is_new_record)?;
                    return Ok(true);
                }
            }
        }
    }

    fn render_question(&mut self, view: &QuestionView, stats: &LiveStats) -> io::Result<()> {
        writeln!(self.output)?;
        write!(
            self.output,
            "Question {}/{}   Score: {}",
            view.number, view.total, stats.score
        )?;
        if stats.show_combo {
            write!(self.output, "   Combo: {}", stats.combo)?;
        }
        writeln!(self.output)?;
        writeln!(self.output, "{}", view.prompt)?;
        if let Some(hint) = &view.hint {
            writeln!(self.output, "  (hint: {hint})")?;
        }
        for (i, choice) in view.choices.iter().enumerate() {
            writeln!(self.output, "  {}) {choice}", i + 1)?;
        }
        Ok(())
    }

    fn render_outcome(&mut self, outcome: &AnswerOutcome, view: &QuestionView) -> io::Result<()> {
        if outcome.is_correct {
            write!(self.output, "✨ Correct! +{}", outcome.points)?;
            if outcome.combo > 1 {
                write!(self.output, " ({} in a row!)", outcome.combo)?;
            }
            writeln!(self.output)
        } else {
            let answer = view
                .choices
                .get(outcome.correct_index)
                .map_or("?", String::as_str);
            writeln!(self.output, "💩 Not quite. The answer was: {answer}")
        }
    }

    fn render_summary(
        &mut self,
        summary: &ResultSummary,
        high_score: u32,
        is_new_record: bool,
    ) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== Results ===")?;
        writeln!(self.output, "Score:     {}", summary.score())?;
        writeln!(self.output, "Correct:   {}", summary.correct_count())?;
        writeln!(self.output, "Wrong:     {}", summary.wrong_count())?;
        writeln!(self.output, "Best combo: {}", summary.max_combo())?;
        writeln!(self.output, "Accuracy:  {}%", summary.accuracy())?;
        let elapsed = summary.elapsed().num_seconds();
        writeln!(self.output, "Time:      {}m {:02}s", elapsed / 60, elapsed % 60)?;
        writeln!(self.output, "{}", summary.tier().message())?;
        if is_new_record {
            writeln!(self.output, "New high score: {high_score}!")?;
        } else {
            writeln!(self.output, "High score: {high_score}")?;
        }
        Ok(())
    }

    fn pick_subject<'a>(&mut self, subjects: &'a [Subject]) -> io::Result<Pick<&'a Subject>> {
        writeln!(self.output)?;
        writeln!(self.output, "Choose a subject:")?;
        for (i, subject) in subjects.iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, subject.name())?;
        }
        writeln!(self.output, "  q) Quit")?;
        Ok(match self.read_menu(subjects.len())? {
            Pick::Item(i) => Pick::Item(&subjects[i]),
            Pick::Back => Pick::Back,
            Pick::Quit => Pick::Quit,
        })
    }

    fn pick_unit<'a>(&mut self, subject: &'a Subject) -> io::Result<Pick<&'a Unit>> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", subject.unit_prompt())?;
        for (i, unit) in subject.units().iter().enumerate() {
            writeln!(self.output, "  {}) {}", i + 1, unit.name())?;
        }
        writeln!(self.output, "  b) Back   q) Quit")?;
        Ok(match self.read_menu(subject.units().len())? {
            Pick::Item(i) => Pick::Item(&subject.units()[i]),
            Pick::Back => Pick::Back,
            Pick::Quit => Pick::Quit,
        })
    }

    fn after_result(&mut self) -> io::Result<AfterResult> {
        loop {
            writeln!(self.output, "r) Play again   u) Choose another unit   q) Quit")?;
            let Some(line) = self.read_line()? else {
                return Ok(AfterResult::Quit);
            };
            match line.as_str() {
                "r" => return Ok(AfterResult::Retry),
                "u" => return Ok(AfterResult::Units),
                "q" => return Ok(AfterResult::Quit),
                _ => {}
            }
        }
    }

    /// Zero-based menu index, `b` for back, `q` or end of input to quit.
    fn read_menu(&mut self, len: usize) -> io::Result<Pick<usize>> {
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(Pick::Quit);
            };
            match line.as_str() {
                "q" => return Ok(Pick::Quit),
                "b" => return Ok(Pick::Back),
                _ => {}
            }
            if let Some(i) = parse_one_based(&line, len) {
                return Ok(Pick::Item(i));
            }
            writeln!(self.output, "Please enter a number from 1 to {len}.")?;
        }
    }

    /// Zero-based choice, or `None` when the player quits.
    fn read_choice(&mut self, len: usize) -> io::Result<Option<usize>> {
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if line == "q" {
                return Ok(None);
            }
            if let Some(i) = parse_one_based(&line, len) {
                return Ok(Some(i));
            }
            writeln!(self.output, "Please enter a number from 1 to {len}.")?;
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_lowercase()))
    }
}

fn parse_one_based(raw: &str, len: usize) -> Option<usize> {
    raw.parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::Clock;
    use quiz_core::model::Catalog;
    use quiz_core::time::fixed_now;
    use std::sync::Arc;
    use storage::repository::{HighScoreRepository, InMemoryQuestionSource, InMemoryRepository};

    const ONE_QUESTION: &str = r#"{ "questions": [
        { "question": "5 - 2 = ?", "choices": ["2", "3"], "correct": 1, "hint": "take two away" }
    ] }"#;

    fn service(repo: &InMemoryRepository) -> SessionLoopService {
        let source = InMemoryQuestionSource::new();
        source
            .insert_json("questions/math/subtraction.json", ONE_QUESTION)
            .unwrap();
        SessionLoopService::new(
            Clock::fixed(fixed_now()),
            Arc::new(Catalog::builtin()),
            Arc::new(source),
            Arc::new(repo.clone()),
        )
    }

    async fn run_script(repo: &InMemoryRepository, script: &str) -> String {
        let mut out = Vec::new();
        {
            let mut presenter =
                Presenter::new(script.as_bytes(), &mut out, service(repo), Duration::ZERO);
            presenter.run().await.unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn one_based_parsing() {
        assert_eq!(parse_one_based("1", 3), Some(0));
        assert_eq!(parse_one_based("3", 3), Some(2));
        assert_eq!(parse_one_based("0", 3), None);
        assert_eq!(parse_one_based("4", 3), None);
        assert_eq!(parse_one_based("x", 3), None);
    }

    #[tokio::test]
    async fn scripted_perfect_round() {
        let repo = InMemoryRepository::new();
        // math -> subtraction -> answer "3" -> quit
        let output = run_script(&repo, "1\n2\n2\nq\n").await;

        assert!(output.contains("5 - 2 = ?"));
        assert!(output.contains("(hint: take two away)"));
        assert!(output.contains("✨ Correct! +10"));
        assert!(output.contains("Accuracy:  100%"));
        assert!(output.contains("Time:      0m 00s"));
        assert!(output.contains("New high score: 10!"));
        assert_eq!(repo.get_high_score().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn wrong_answer_shows_correct_choice() {
        let repo = InMemoryRepository::new();
        let output = run_script(&repo, "1\n2\n1\nq\n").await;

        assert!(output.contains("The answer was: 3"));
        assert!(output.contains("Accuracy:  0%"));
        assert!(output.contains("High score: 0"));
    }

    #[tokio::test]
    async fn missing_unit_reports_load_error() {
        let repo = InMemoryRepository::new();
        // math -> addition (no file) -> quit
        let output = run_script(&repo, "1\n1\nq\n").await;
        assert!(output.contains("Could not load the questions"));
    }

    #[tokio::test]
    async fn play_again_restarts_unit() {
        let repo = InMemoryRepository::new();
        let output = run_script(&repo, "1\n2\n2\nr\n2\nq\n").await;
        assert_eq!(output.matches("=== Results ===").count(), 2);
    }
}
