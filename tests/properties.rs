//! Randomized checks: the engine agrees with brute force on small divisions, certificates always
//! verify, and both solvers give the same answers.

use division_elimination::{
    verify_certificate, Dinic, Division, EdmondsKarp, EliminationEngine, EliminationMethod,
    TeamRecord,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Consistent random division: symmetric schedule, zero diagonal, rows sum to `remaining`.
fn random_division(rng: &mut StdRng, teams: usize, max_games: u32, max_wins: u32) -> Division {
    let mut matrix = vec![vec![0u32; teams]; teams];
    for i in 0..teams {
        for j in i + 1..teams {
            let g = rng.gen_range(0..=max_games);
            matrix[i][j] = g;
            matrix[j][i] = g;
        }
    }
    let records = matrix
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let remaining = row.iter().sum();
            TeamRecord::new(
                format!("T{i}"),
                rng.gen_range(0..=max_wins),
                rng.gen_range(0..=max_wins),
                remaining,
                row,
            )
        })
        .collect();
    Division::new(records).unwrap()
}

/// Try every split of the games among the other teams (the candidate wins all of its own).
fn brute_force_eliminated(division: &Division, candidate: &str) -> bool {
    let best = division.team(candidate).unwrap().max_possible_wins();
    let others: Vec<_> = division
        .team_records()
        .iter()
        .filter(|t| t.name != candidate)
        .collect();
    let mut pairs = Vec::new();
    for a in 0..others.len() {
        for b in a + 1..others.len() {
            pairs.push((a, b, u64::from(others[a].against_index(others[b].index))));
        }
    }
    let mut wins: Vec<u64> = others.iter().map(|t| u64::from(t.wins)).collect();
    !some_outcome_fits(&pairs, &mut wins, best)
}

fn some_outcome_fits(pairs: &[(usize, usize, u64)], wins: &mut [u64], best: u64) -> bool {
    let Some((&(a, b, games), rest)) = pairs.split_first() else {
        return wins.iter().all(|&w| w <= best);
    };
    for to_a in 0..=games {
        wins[a] += to_a;
        wins[b] += games - to_a;
        let fits = wins[a] <= best && wins[b] <= best && some_outcome_fits(rest, wins, best);
        wins[a] -= to_a;
        wins[b] -= games - to_a;
        if fits {
            return true;
        }
    }
    false
}

#[test]
fn engine_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..300 {
        let n = rng.gen_range(1..=5);
        let d = random_division(&mut rng, n, 2, 8);
        let engine = EliminationEngine::new(&d);
        for team in d.teams() {
            assert_eq!(
                engine.is_eliminated(team).unwrap(),
                brute_force_eliminated(&d, team),
                "team {} in {:?}",
                team,
                d.team_records()
            );
        }
    }
}

#[test]
fn certificates_verify_and_exclude_candidate() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let n = rng.gen_range(2..=8);
        let d = random_division(&mut rng, n, 6, 40);
        let engine = EliminationEngine::new(&d);
        for team in d.teams() {
            let result = engine.analyze(team).unwrap();
            if result.eliminated {
                assert!(!result.certificate.is_empty());
                assert!(!result.certificate.iter().any(|t| t == team));
                assert!(verify_certificate(&d, team, &result.certificate).unwrap());
                if result.method == EliminationMethod::Trivial {
                    let best = d.team(team).unwrap().max_possible_wins();
                    for t in &result.certificate {
                        assert!(u64::from(d.wins(t).unwrap()) > best);
                    }
                }
            } else {
                assert!(result.certificate.is_empty());
                assert_eq!(engine.certificate_of_elimination(team).unwrap(), None);
            }
        }
    }
}

#[test]
fn trivial_competitor_is_in_certificate() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..200 {
        let n = rng.gen_range(2..=6);
        let d = random_division(&mut rng, n, 3, 30);
        for candidate in d.team_records() {
            let best = candidate.max_possible_wins();
            let cert = EliminationEngine::new(&d)
                .certificate_of_elimination(&candidate.name)
                .unwrap();
            for t in d.team_records() {
                if u64::from(t.wins) > best {
                    let cert = cert.as_ref().unwrap();
                    assert!(cert.contains(&t.name));
                }
            }
        }
    }
}

#[test]
fn solvers_agree_on_random_divisions() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..100 {
        let n = rng.gen_range(2..=10);
        let d = random_division(&mut rng, n, 8, 60);
        let ek = EliminationEngine::with_solver(&d, EdmondsKarp).report().unwrap();
        let dinic = EliminationEngine::with_solver(&d, Dinic).report().unwrap();
        assert_eq!(ek, dinic);
    }
}
