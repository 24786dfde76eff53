use smallvec::SmallVec;

use crate::problem::{location::LocationIdx, routing_problem::RoutingProblem};

use super::solution::{route::Route, solution::Solution};

/// Intra-route 3-opt pass over every route of a solution. Ranks candidate
/// reconnections by plain geometric tour length; penalties play no part here.
pub fn refine(problem: &RoutingProblem, solution: &Solution) -> Solution {
    let routes = solution
        .routes()
        .iter()
        .map(|route| {
            // Fewer than five stops leaves no room for three cuts.
            if route.len() < 5 {
                return route.clone();
            }

            let stops = refine_stops(problem, route.stops().to_vec());
            Route::new(route.vehicle_idx(), stops)
        })
        .collect();

    Solution::new(routes)
}

fn refine_stops(problem: &RoutingProblem, mut stops: Vec<LocationIdx>) -> Vec<LocationIdx> {
    let mut improved = true;

    while improved {
        improved = false;
        let current_length = tour_length(problem, &stops);

        'scan: for i in 1..stops.len() - 3 {
            for j in i + 1..stops.len() - 2 {
                for k in j + 1..stops.len() - 1 {
                    let (best, best_length) = reconnections(&stops, i, j, k)
                        .into_iter()
                        .map(|candidate| {
                            let length = tour_length(problem, &candidate);
                            (candidate, length)
                        })
                        .min_by(|(_, a), (_, b)| a.total_cmp(b))
                        .unwrap();

                    if best_length < current_length {
                        stops = best;
                        improved = true;
                        break 'scan;
                    }
                }
            }
        }
    }

    stops
}

/// The restricted reconnection set: reverse the second segment, reverse the
/// third, exchange the two, or exchange with the second reversed. The
/// unchanged tour needs no candidate since acceptance requires strict
/// improvement.
fn reconnections(
    stops: &[LocationIdx],
    i: usize,
    j: usize,
    k: usize,
) -> SmallVec<[Vec<LocationIdx>; 4]> {
    let head = &stops[..i];
    let second = &stops[i..j];
    let third = &stops[j..k];
    let tail = &stops[k..];

    let second_reversed: Vec<LocationIdx> = second.iter().rev().copied().collect();
    let third_reversed: Vec<LocationIdx> = third.iter().rev().copied().collect();

    let mut candidates: SmallVec<[Vec<LocationIdx>; 4]> = SmallVec::new();

    candidates.push(concat(&[head, &second_reversed, third, tail]));
    candidates.push(concat(&[head, second, &third_reversed, tail]));
    candidates.push(concat(&[head, third, second, tail]));
    candidates.push(concat(&[head, third, &second_reversed, tail]));

    candidates
}

fn concat(parts: &[&[LocationIdx]]) -> Vec<LocationIdx> {
    let mut stops = Vec::with_capacity(parts.iter().map(|part| part.len()).sum());
    for part in parts {
        stops.extend_from_slice(part);
    }
    stops
}

fn tour_length(problem: &RoutingProblem, stops: &[LocationIdx]) -> f64 {
    stops
        .windows(2)
        .map(|edge| {
            problem
                .location(edge[0])
                .euclidean_distance(problem.location(edge[1]))
        })
        .sum()
}
