use connector_align::alignment::positional::positional_equivalent;
use connector_align::alignment::tokenization::{casefold, is_separator, tokenize};
use connector_align::alignment::window::search_equivalent;
use connector_align::{ConnectorSet, MatchLedger};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEED: u64 = 42;
const ROUNDS: usize = 500;

const FILLER: [&str; 8] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta",
];
const CONNECTORS: [&str; 5] = ["but", "yet", "after all", "even so", "on the other hand"];

fn random_line(rng: &mut StdRng) -> String {
    const ALPHABET: &[char] = &[
        'a', 'b', 'Ä', 'ß', 'x', ' ', ' ', '\t', '.', ',', '/', ':', '?', '!', '-', '\'',
    ];
    let len = rng.gen_range(0..60);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect()
}

fn filler_sentence(rng: &mut StdRng, len: usize) -> Vec<String> {
    (0..len)
        .map(|_| FILLER[rng.gen_range(0..FILLER.len())].to_string())
        .collect()
}

#[test]
fn tokenizer_is_idempotent_and_drops_separators() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..ROUNDS {
        let line = random_line(&mut rng);
        let tokens = tokenize(&line);
        assert!(tokens.iter().all(|t| !t.is_empty()), "{line:?}");
        assert!(tokens.iter().all(|t| !t.chars().any(is_separator)), "{line:?}");
        assert_eq!(tokenize(&tokens.join(" ")), tokens, "{line:?}");
    }
}

#[test]
fn casefold_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..ROUNDS {
        let line = random_line(&mut rng);
        let folded = casefold(&line);
        assert_eq!(casefold(&folded), folded);
        assert!(!folded.contains('ß'));
    }
}

#[test]
fn ledger_counts_every_note_exactly() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let sources = ["aber", "doch", "jedoch"];
    let equivalents = ["", "but", "yet", "however"];
    let mut expected = std::collections::HashMap::new();
    let mut ledger = MatchLedger::new();
    for _ in 0..ROUNDS {
        let source = sources[rng.gen_range(0..sources.len())];
        let equivalent = equivalents[rng.gen_range(0..equivalents.len())];
        let before = ledger.count(source, equivalent);
        ledger.note_match(source, equivalent);
        assert_eq!(ledger.count(source, equivalent), before + 1);
        *expected.entry((source, equivalent)).or_insert(0u64) += 1;
    }
    for ((source, equivalent), count) in expected {
        assert_eq!(ledger.count(source, equivalent), count);
    }
    let total: u64 = sources.iter().map(|s| ledger.total(s)).sum();
    assert_eq!(total, ROUNDS as u64);
}

#[test]
fn positional_equivalent_clamps_to_last_token() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..ROUNDS {
        let len = rng.gen_range(0..10);
        let target = filler_sentence(&mut rng, len);
        let position = rng.gen_range(0..20);
        let found = positional_equivalent(&target, position);
        match target.len() {
            0 => assert_eq!(found, ""),
            n => assert_eq!(found, target[position.min(n - 1)]),
        }
    }
}

#[test]
fn window_search_finds_planted_connector() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let connectors = ConnectorSet::new(CONNECTORS);
    let (frame, start) = (33usize, -16isize);
    for _ in 0..ROUNDS {
        let planted = CONNECTORS[rng.gen_range(0..CONNECTORS.len())];
        let width = planted.split(' ').count();
        let len = rng.gen_range(width..50);
        let mut target = filler_sentence(&mut rng, len);
        let entry = rng.gen_range(0..len);

        let first = (entry as isize + start).max(0) as usize;
        let last = (entry as isize + start + frame as isize).min(len as isize) as usize;
        if last < first + width {
            continue;
        }
        let at = rng.gen_range(first..=last - width);
        for (offset, word) in planted.split(' ').enumerate() {
            target[at + offset] = word.to_string();
        }

        for max_window in width..=6 {
            let found = search_equivalent(&target, entry, frame, start, max_window, &connectors);
            assert_eq!(found, planted, "target={target:?} entry={entry} max_window={max_window}");
        }
        if width > 1 {
            let found = search_equivalent(&target, entry, frame, start, width - 1, &connectors);
            assert_eq!(found, "", "target={target:?} entry={entry}");
        }
    }
}

#[test]
fn window_search_result_is_empty_or_a_member() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let connectors = ConnectorSet::new(CONNECTORS);
    let vocab: Vec<&str> = FILLER
        .iter()
        .copied()
        .chain(["but", "on", "the", "other", "hand", "after", "all"])
        .collect();
    for _ in 0..ROUNDS {
        let len = rng.gen_range(0..30);
        let target: Vec<String> = (0..len)
            .map(|_| vocab[rng.gen_range(0..vocab.len())].to_string())
            .collect();
        let entry = rng.gen_range(0..40);
        let frame = rng.gen_range(1..40);
        let start = rng.gen_range(-20..5);
        let found = search_equivalent(&target, entry, frame, start, 4, &connectors);
        assert!(found.is_empty() || connectors.contains(&found), "{found:?}");
    }
}
