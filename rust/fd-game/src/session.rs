//! One game: first move, dice selection, two fair throws, winner.
//!
//! Every value the computer contributes to chance goes through an
//! `fd_fair` commitment: the digest is printed before the user answers and the
//! key is printed right after.

use std::io::{BufRead, Write};

use fd_core::{best_counter, Config, DiceError, DiceSet, Die, MIN_GAME_DICE};
use fd_fair::{
    sample_below, FairError, Revealed, Uncommitted, HMAC_ALGORITHM, VALUE_ENCODING,
};
use fd_logging::{
    debug_log, now_ms, CommitEventV1, GameResultEventV1, NdjsonError, NdjsonWriter,
    RevealEventV1, SessionStartEventV1, VersionInfoV1, EVENT_COMMIT, EVENT_GAME_RESULT,
    EVENT_REVEAL, EVENT_SESSION_START,
};
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use thiserror::Error;

use crate::prompt::{ask, parse_choice, write_menu, MenuChoice};
use crate::table::render_probability_table;

const PROMPT: &str = "Your selection: ";

#[derive(Debug, Error)]
pub enum GameError {
    #[error("game aborted")]
    Aborted,
    #[error("console io: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Dice(#[from] DiceError),
    #[error(transparent)]
    Fair(#[from] FairError),
    #[error(transparent)]
    Transcript(#[from] NdjsonError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    User,
    Computer,
}

impl Player {
    pub fn as_str(&self) -> &'static str {
        match self {
            Player::User => "user",
            Player::Computer => "computer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    UserWins,
    ComputerWins,
    Tie,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::UserWins => "user",
            Outcome::ComputerWins => "computer",
            Outcome::Tie => "tie",
        }
    }
}

/// What a protocol round is used for; recorded in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    FirstMove,
    ComputerThrow,
    UserThrow,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::FirstMove => "first_move",
            Purpose::ComputerThrow => "computer_throw",
            Purpose::UserThrow => "user_throw",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameReport {
    pub first: Player,
    /// Indices into the configured dice.
    pub computer_die: usize,
    pub user_die: usize,
    pub computer_face: i64,
    pub user_face: i64,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy)]
pub struct GameOptions {
    pub key_bytes: usize,
    pub precision: usize,
    pub min_dice: usize,
}

impl From<&Config> for GameOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            key_bytes: cfg.fair.key_bytes,
            precision: cfg.display.precision,
            min_dice: cfg.dice.min_dice,
        }
    }
}

impl Default for GameOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

pub struct Game<R> {
    dice: DiceSet,
    opts: GameOptions,
    rng: R,
    transcript: Option<NdjsonWriter>,
    round: u32,
}

impl Game<OsRng> {
    /// Game drawing all computer randomness from the OS CSPRNG.
    pub fn new(dice: DiceSet, opts: GameOptions) -> Result<Self, GameError> {
        Self::with_rng(dice, opts, OsRng)
    }
}

impl<R: RngCore + CryptoRng> Game<R> {
    pub fn with_rng(dice: DiceSet, opts: GameOptions, rng: R) -> Result<Self, GameError> {
        // Never fewer than three, whatever the configured minimum.
        dice.require_at_least(opts.min_dice.max(MIN_GAME_DICE))?;
        // Fail at startup rather than at the first commitment.
        Uncommitted::with_key_len(2, opts.key_bytes)?;
        Ok(Self {
            dice,
            opts,
            rng,
            transcript: None,
            round: 0,
        })
    }

    /// Record the session to `writer`, starting with a `session_start` event.
    pub fn with_transcript(
        mut self,
        mut writer: NdjsonWriter,
        config_hash: Option<String>,
    ) -> Result<Self, GameError> {
        writer.write_event(&SessionStartEventV1 {
            event: EVENT_SESSION_START.to_string(),
            ts_ms: now_ms(),
            v: version_info(),
            dice: self.dice.iter().map(|d| d.to_string()).collect(),
            config_hash,
        })?;
        self.transcript = Some(writer);
        Ok(self)
    }

    pub fn dice(&self) -> &DiceSet {
        &self.dice
    }

    pub fn play<I: BufRead, O: Write>(
        &mut self,
        input: &mut I,
        out: &mut O,
    ) -> Result<GameReport, GameError> {
        let first = self.first_move(input, out)?;
        let (computer_die, user_die) = self.select_dice(first, input, out)?;

        writeln!(out, "It's time for my throw.")?;
        let computer_face = self.throw(Purpose::ComputerThrow, computer_die, input, out)?;
        writeln!(out, "My throw is {computer_face}.")?;

        writeln!(out, "It's time for your throw.")?;
        let user_face = self.throw(Purpose::UserThrow, user_die, input, out)?;
        writeln!(out, "Your throw is {user_face}.")?;

        let outcome = match user_face.cmp(&computer_face) {
            std::cmp::Ordering::Greater => {
                writeln!(out, "You win ({user_face} > {computer_face})!")?;
                Outcome::UserWins
            }
            std::cmp::Ordering::Less => {
                writeln!(out, "I win ({computer_face} > {user_face})!")?;
                Outcome::ComputerWins
            }
            std::cmp::Ordering::Equal => {
                writeln!(out, "It's a tie ({user_face} = {computer_face})!")?;
                Outcome::Tie
            }
        };

        let report = GameReport {
            first,
            computer_die,
            user_die,
            computer_face,
            user_face,
            outcome,
        };
        self.log_result(&report)?;
        Ok(report)
    }

    fn first_move<I: BufRead, O: Write>(
        &mut self,
        input: &mut I,
        out: &mut O,
    ) -> Result<Player, GameError> {
        writeln!(out, "Let's determine who makes the first move.")?;
        let rev = self.fair_round(Purpose::FirstMove, 2, "Try to guess my selection.", input, out)?;
        writeln!(
            out,
            "My selection: {} (KEY={}).",
            rev.own_value(),
            rev.key().to_hex()
        )?;
        // (c + u) mod 2 == 0 exactly when the guess matches.
        if rev.result() == 0 {
            writeln!(out, "You guessed correctly, you make the first move.")?;
            Ok(Player::User)
        } else {
            writeln!(out, "You guessed wrong, I make the first move.")?;
            Ok(Player::Computer)
        }
    }

    /// Returns `(computer_die, user_die)` as indices into the configured dice.
    fn select_dice<I: BufRead, O: Write>(
        &mut self,
        first: Player,
        input: &mut I,
        out: &mut O,
    ) -> Result<(usize, usize), GameError> {
        let all: Vec<usize> = (0..self.dice.len()).collect();
        match first {
            Player::Computer => {
                let pick = sample_below(&mut self.rng, all.len() as u64)? as usize;
                writeln!(
                    out,
                    "I make the first move and choose the [{}] dice.",
                    self.die(pick)?
                )?;
                let rest: Vec<usize> = all.into_iter().filter(|&i| i != pick).collect();
                let user = self.user_pick(&rest, input, out)?;
                Ok((pick, user))
            }
            Player::User => {
                let user = self.user_pick(&all, input, out)?;
                let rest: Vec<usize> = all.into_iter().filter(|&i| i != user).collect();
                let pick = best_counter(&self.dice, user, &rest).ok_or(DiceError::TooFewDice {
                    min: MIN_GAME_DICE,
                    found: self.dice.len(),
                })?;
                writeln!(out, "I choose the [{}] dice.", self.die(pick)?)?;
                Ok((pick, user))
            }
        }
    }

    fn user_pick<I: BufRead, O: Write>(
        &mut self,
        available: &[usize],
        input: &mut I,
        out: &mut O,
    ) -> Result<usize, GameError> {
        let labels: Vec<String> = available
            .iter()
            .filter_map(|&i| self.dice.get(i).map(Die::to_string))
            .collect();
        loop {
            writeln!(out, "Choose your dice:")?;
            write_menu(out, &labels)?;
            let line = ask(input, out, PROMPT)?.ok_or(GameError::Aborted)?;
            match parse_choice(&line) {
                MenuChoice::Exit => return Err(GameError::Aborted),
                MenuChoice::Help => self.write_help(out)?,
                MenuChoice::Number(n) if (n as usize) < available.len() => {
                    let idx = available[n as usize];
                    writeln!(out, "You choose the [{}] dice.", self.die(idx)?)?;
                    return Ok(idx);
                }
                MenuChoice::Number(_) | MenuChoice::Invalid => {
                    writeln!(out, "Invalid choice, try again.")?;
                }
            }
        }
    }

    fn throw<I: BufRead, O: Write>(
        &mut self,
        purpose: Purpose,
        die: usize,
        input: &mut I,
        out: &mut O,
    ) -> Result<i64, GameError> {
        let faces = self.die(die)?.face_count() as u64;
        let intro = format!("Add your number modulo {faces}.");
        let rev = self.fair_round(purpose, faces, &intro, input, out)?;
        writeln!(
            out,
            "My number is {} (KEY={}).",
            rev.own_value(),
            rev.key().to_hex()
        )?;
        writeln!(
            out,
            "The fair number generation result is {} + {} = {} (mod {}).",
            rev.own_value(),
            rev.counterpart_value(),
            rev.result(),
            rev.modulus()
        )?;
        Ok(self.die(die)?.roll(rev.result() as usize)?)
    }

    /// Commit, show the digest, read the counterpart value, reveal.
    ///
    /// Invalid or out-of-range answers are asked again under the same digest.
    fn fair_round<I: BufRead, O: Write>(
        &mut self,
        purpose: Purpose,
        n: u64,
        intro: &str,
        input: &mut I,
        out: &mut O,
    ) -> Result<Revealed, GameError> {
        let mut committed =
            Uncommitted::with_key_len(n, self.opts.key_bytes)?.commit_with(&mut self.rng)?;
        self.round += 1;
        let hmac = committed.digest().to_hex();
        debug_log!("round {} ({}): committed n={n}", self.round, purpose.as_str());
        if let Some(w) = self.transcript.as_mut() {
            w.write_event(&CommitEventV1 {
                event: EVENT_COMMIT.to_string(),
                ts_ms: now_ms(),
                v: version_info(),
                round: self.round,
                purpose: purpose.as_str().to_string(),
                modulus: n,
                hmac: hmac.clone(),
            })?;
        }

        writeln!(
            out,
            "I selected a random value in the range 0..{} (HMAC={hmac}).",
            n - 1
        )?;
        writeln!(out, "{intro}")?;
        let labels: Vec<String> = (0..n).map(|i| i.to_string()).collect();
        let revealed = loop {
            write_menu(out, &labels)?;
            let line = ask(input, out, PROMPT)?.ok_or(GameError::Aborted)?;
            match parse_choice(&line) {
                MenuChoice::Exit => return Err(GameError::Aborted),
                MenuChoice::Help => self.write_help(out)?,
                MenuChoice::Invalid => writeln!(out, "Invalid choice, try again.")?,
                MenuChoice::Number(u) => match committed.reveal(u) {
                    Ok(rev) => break rev,
                    Err(rejected) => {
                        writeln!(out, "Invalid choice: {}. Try again.", rejected.error())?;
                        committed = rejected.into_committed();
                    }
                },
            }
        };

        debug_log!(
            "round {} ({}): revealed c={} u={} result={}",
            self.round,
            purpose.as_str(),
            revealed.own_value(),
            revealed.counterpart_value(),
            revealed.result()
        );
        if let Some(w) = self.transcript.as_mut() {
            w.write_event(&RevealEventV1 {
                event: EVENT_REVEAL.to_string(),
                ts_ms: now_ms(),
                v: version_info(),
                round: self.round,
                purpose: purpose.as_str().to_string(),
                modulus: n,
                hmac,
                key: revealed.key().to_hex(),
                own_value: revealed.own_value(),
                counterpart_value: revealed.counterpart_value(),
                result: revealed.result(),
            })?;
        }
        Ok(revealed)
    }

    fn write_help<O: Write>(&self, out: &mut O) -> Result<(), GameError> {
        writeln!(
            out,
            "Every random value I contribute is committed before you answer: I show \
             {HMAC_ALGORITHM}(KEY, value) first and reveal KEY and value afterwards."
        )?;
        writeln!(
            out,
            "The value is hashed as {VALUE_ENCODING} (e.g. 5 -> \"5\"); recompute the HMAC to check me."
        )?;
        writeln!(out, "Probability of the win for the user:")?;
        write!(
            out,
            "{}",
            render_probability_table(&self.dice, self.opts.precision)
        )?;
        Ok(())
    }

    fn log_result(&mut self, report: &GameReport) -> Result<(), GameError> {
        let computer_die = self.die(report.computer_die)?.to_string();
        let user_die = self.die(report.user_die)?.to_string();
        if let Some(w) = self.transcript.as_mut() {
            w.write_event(&GameResultEventV1 {
                event: EVENT_GAME_RESULT.to_string(),
                ts_ms: now_ms(),
                v: version_info(),
                first_player: report.first.as_str().to_string(),
                computer_die,
                user_die,
                computer_face: report.computer_face,
                user_face: report.user_face,
                outcome: report.outcome.as_str().to_string(),
            })?;
            w.flush()?;
        }
        Ok(())
    }

    fn die(&self, index: usize) -> Result<&Die, DiceError> {
        self.dice.get(index).ok_or(DiceError::FaceIndex {
            index,
            faces: self.dice.len(),
        })
    }
}

pub fn version_info() -> VersionInfoV1 {
    VersionInfoV1::new(HMAC_ALGORITHM, VALUE_ENCODING)
}
