#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use fd_core::{best_counter, DiceError, DiceSet};
    use fd_fair::{verify, Digest, FairError, SecretKey};
    use fd_logging::{read_events, read_reveals, NdjsonWriter};
    use rand_chacha::ChaCha8Rng;
    use rand_core::SeedableRng;

    use crate::{Game, GameError, GameOptions, Outcome, Player, CORNER};

    const ANSWERS: &str = "0\n0\n0\n0\n";

    fn classic() -> DiceSet {
        DiceSet::parse(&["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]).unwrap()
    }

    fn seeded(seed: u64) -> Game<ChaCha8Rng> {
        Game::with_rng(classic(), GameOptions::default(), ChaCha8Rng::seed_from_u64(seed)).unwrap()
    }

    fn run(game: &mut Game<ChaCha8Rng>, input: &str) -> (Result<crate::GameReport, GameError>, String) {
        let mut inp = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let r = game.play(&mut inp, &mut out);
        (r, String::from_utf8(out).unwrap())
    }

    fn between<'a>(line: &'a str, start: &str, end: &str) -> Option<&'a str> {
        let i = line.find(start)? + start.len();
        let j = line[i..].find(end)? + i;
        Some(&line[i..j])
    }

    /// (hmac, value, key) per round, in dialogue order.
    fn disclosed(out: &str) -> Vec<(String, u64, String)> {
        let hmacs: Vec<&str> = out
            .lines()
            .filter_map(|l| between(l, "(HMAC=", ")."))
            .collect();
        // Scripted input is not echoed, so a reveal shares its line with the prompt.
        let reveals: Vec<(u64, &str)> = out
            .lines()
            .filter_map(|l| {
                ["My selection: ", "My number is "]
                    .iter()
                    .find_map(|marker| l.find(marker).map(|i| &l[i + marker.len()..]))
            })
            .map(|rest| {
                let value = rest.split(" (KEY=").next().unwrap();
                (value.parse().unwrap(), between(rest, "(KEY=", ").").unwrap())
            })
            .collect();
        assert_eq!(hmacs.len(), reveals.len());
        hmacs
            .into_iter()
            .zip(reveals)
            .map(|(h, (v, k))| (h.to_string(), v, k.to_string()))
            .collect()
    }

    #[test]
    fn full_game_discloses_verifiable_commitments() {
        let mut game = seeded(7);
        let (r, out) = run(&mut game, ANSWERS);
        let report = r.unwrap();

        let rounds = disclosed(&out);
        assert_eq!(rounds.len(), 3);
        for (hmac, value, key) in &rounds {
            assert_eq!(hmac.len(), 64);
            assert_eq!(key.len(), 64);
            let key = SecretKey::from_hex(key).unwrap();
            let digest = Digest::from_hex(hmac).unwrap();
            assert!(verify(key.as_bytes(), *value, &digest));
        }

        assert!(out.contains(&format!("My throw is {}.", report.computer_face)));
        assert!(out.contains(&format!("Your throw is {}.", report.user_face)));
        assert_ne!(report.computer_die, report.user_die);
        let expected = match report.user_face.cmp(&report.computer_face) {
            std::cmp::Ordering::Greater => Outcome::UserWins,
            std::cmp::Ordering::Less => Outcome::ComputerWins,
            std::cmp::Ordering::Equal => Outcome::Tie,
        };
        assert_eq!(report.outcome, expected);
    }

    #[test]
    fn digest_is_shown_before_the_prompt_and_key_after() {
        let mut game = seeded(1);
        let (r, out) = run(&mut game, ANSWERS);
        r.unwrap();
        let hmac_at = out.find("(HMAC=").unwrap();
        let prompt_at = out.find("Your selection: ").unwrap();
        let key_at = out.find("(KEY=").unwrap();
        assert!(hmac_at < prompt_at);
        assert!(prompt_at < key_at);
    }

    #[test]
    fn bad_answers_are_asked_again_under_the_same_digest() {
        let mut game = seeded(3);
        let (r, out) = run(&mut game, &format!("7\nabc\n{ANSWERS}"));
        r.unwrap();
        assert!(out.contains("value 7 is outside the range [0, 2)"));
        assert!(out.contains("Invalid choice, try again."));
        assert_eq!(
            out.matches("I selected a random value in the range 0..1 ").count(),
            1
        );
        for (hmac, value, key) in disclosed(&out) {
            let key = SecretKey::from_hex(&key).unwrap();
            assert!(verify(key.as_bytes(), value, &Digest::from_hex(&hmac).unwrap()));
        }
    }

    #[test]
    fn exit_and_eof_abort() {
        let (r, out) = run(&mut seeded(0), "x\n");
        assert!(matches!(r, Err(GameError::Aborted)));
        assert!(!out.contains("(KEY="));

        let (r, _) = run(&mut seeded(0), "");
        assert!(matches!(r, Err(GameError::Aborted)));

        let (r, _) = run(&mut seeded(0), "0\nX\n");
        assert!(matches!(r, Err(GameError::Aborted)));
    }

    #[test]
    fn help_prints_probability_table() {
        let (r, out) = run(&mut seeded(5), &format!("?\n{ANSWERS}"));
        r.unwrap();
        assert!(out.contains(CORNER));
        assert!(out.contains("HMAC-SHA3-256"));
        assert!(out.contains("- (0.33)"));
    }

    #[test]
    fn dice_choice_follows_who_moves_first() {
        let set = classic();
        let mut user_first = 0;
        let mut computer_first = 0;
        for seed in 0..32 {
            let (r, _) = run(&mut seeded(seed), ANSWERS);
            let report = r.unwrap();
            match report.first {
                Player::User => {
                    user_first += 1;
                    // Menu entry 0 is the first configured die.
                    assert_eq!(report.user_die, 0);
                    assert_eq!(best_counter(&set, 0, &[1, 2]), Some(report.computer_die));
                }
                Player::Computer => {
                    computer_first += 1;
                    assert_ne!(report.computer_die, report.user_die);
                }
            }
        }
        assert!(user_first > 0);
        assert!(computer_first > 0);
    }

    #[test]
    fn same_seed_same_game() {
        let (a, out_a) = run(&mut seeded(11), ANSWERS);
        let (b, out_b) = run(&mut seeded(11), ANSWERS);
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_eq!(a.computer_face, b.computer_face);
        assert_eq!(a.user_face, b.user_face);
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn rejects_too_few_dice_and_short_keys() {
        let two = DiceSet::parse(&["1,2,3,4", "2,3,4,5"]).unwrap();
        let r = Game::with_rng(two, GameOptions::default(), ChaCha8Rng::seed_from_u64(0));
        assert!(matches!(
            r,
            Err(GameError::Dice(DiceError::TooFewDice { min: 3, found: 2 }))
        ));

        let opts = GameOptions {
            key_bytes: 16,
            ..GameOptions::default()
        };
        let r = Game::with_rng(classic(), opts, ChaCha8Rng::seed_from_u64(0));
        assert!(matches!(
            r,
            Err(GameError::Fair(FairError::KeyLength { len: 16 }))
        ));
    }

    #[test]
    fn configured_minimum_never_drops_below_three_dice() {
        let opts = GameOptions {
            min_dice: 1,
            ..GameOptions::default()
        };
        for tokens in [&["1,2,3,4"][..], &["1,2,3,4", "2,3,4,5"][..]] {
            let set = DiceSet::parse(tokens).unwrap();
            let r = Game::with_rng(set, opts, ChaCha8Rng::seed_from_u64(0));
            assert!(
                matches!(
                    r,
                    Err(GameError::Dice(DiceError::TooFewDice { min: 3, found })) if found == tokens.len()
                ),
                "{tokens:?}"
            );
        }

        let mut game =
            Game::with_rng(classic(), opts, ChaCha8Rng::seed_from_u64(4)).unwrap();
        let (r, _) = run(&mut game, ANSWERS);
        r.unwrap();
    }

    #[test]
    fn reveal_lines_carry_value_and_key() {
        let (r, out) = run(&mut seeded(6), ANSWERS);
        r.unwrap();
        assert!(out.contains("Your selection: My selection: "), "{out}");
        assert_eq!(disclosed(&out).len(), 3);
    }

    #[test]
    fn longer_keys_are_disclosed_in_full() {
        let opts = GameOptions {
            key_bytes: 48,
            ..GameOptions::default()
        };
        let mut game =
            Game::with_rng(classic(), opts, ChaCha8Rng::seed_from_u64(2)).unwrap();
        let (r, out) = run(&mut game, ANSWERS);
        r.unwrap();
        for (_, _, key) in disclosed(&out) {
            assert_eq!(key.len(), 96);
        }
    }

    #[test]
    fn transcript_records_every_round() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.ndjson");
        let writer = NdjsonWriter::open_append_with_flush(&path, 1).unwrap();
        let mut game = seeded(9)
            .with_transcript(writer, Some("cafe".to_string()))
            .unwrap();
        let (r, _) = run(&mut game, ANSWERS);
        let report = r.unwrap();
        drop(game);

        let events = read_events(&path).unwrap();
        let kinds: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
        assert_eq!(
            kinds,
            [
                "session_start",
                "commit",
                "reveal",
                "commit",
                "reveal",
                "commit",
                "reveal",
                "game_result"
            ]
        );
        assert_eq!(events[0]["config_hash"], "cafe");
        assert_eq!(events[0]["dice"][1], "6,8,1,1,8,6");
        assert_eq!(events[1]["purpose"], "first_move");
        assert_eq!(events[1]["modulus"], 2);

        let reveals = read_reveals(&path).unwrap();
        assert_eq!(reveals.len(), 3);
        for (i, rv) in reveals.iter().enumerate() {
            assert_eq!(rv.round, i as u32 + 1);
            assert_eq!(rv.result, (rv.own_value + rv.counterpart_value) % rv.modulus);
            let key = SecretKey::from_hex(&rv.key).unwrap();
            assert!(verify(key.as_bytes(), rv.own_value, &Digest::from_hex(&rv.hmac).unwrap()));
        }
        assert_eq!(reveals[1].purpose, "computer_throw");
        assert_eq!(reveals[2].purpose, "user_throw");
        assert_eq!(reveals[1].modulus, 6);

        let last = events.last().unwrap();
        assert_eq!(last["computer_face"], report.computer_face);
        assert_eq!(last["user_face"], report.user_face);
        assert_eq!(last["outcome"], report.outcome.as_str());
    }
}
