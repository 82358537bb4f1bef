//! Beta contest example for the game and ARA solvers
//!
//! The defender invests `d` and the attacker `a`, both in `[0, 1)`. The share
//! of the prize captured by the attacker is `theta ~ Beta(a - d + 1 + eps,
//! d - a + 1 + eps)`. Both players have exponential (constant absolute risk
//! aversion) utilities over their net payoff.
//!
//! In the game setting both players know everything. In the ARA setting the
//! defender is unsure of the attacker's risk aversion, investment cost and
//! beliefs about the contest, and holds priors over them instead.

use ara_mcmc::{
    mcmc_adg, mcmc_ara, DecisionModel, ProbabilityModel, ProbabilityPrior, RandomDecisionModel,
    SolverConfig, SolverError, StrategyGrid, Utility, UtilityPrior,
};
use rand::{Rng, RngCore};
use rand_distr::{Beta, Distribution};

/// Constants of the contest
#[derive(Debug, Clone, Copy)]
struct Contest {
    /// Value at stake
    prize: f64,
    /// Cost per unit of defensive investment
    defense_cost: f64,
    /// Cost per unit of attacking investment
    attack_cost: f64,
    /// Keeps both Beta parameters positive
    eps: f64,
}

impl Default for Contest {
    fn default() -> Self {
        Contest {
            prize: 100.0,
            defense_cost: 50.0,
            attack_cost: 50.0,
            eps: 0.01,
        }
    }
}

/// Defender keeps `(1 - theta) * prize` and pays for its investment
struct DefenderUtility {
    contest: Contest,
    risk_aversion: f64,
}

impl Utility for DefenderUtility {
    fn evaluate(&self, d: f64, theta: &[f64]) -> ara_mcmc::Result<Vec<f64>> {
        Ok(theta
            .iter()
            .map(|t| {
                let payoff = (1.0 - t) * self.contest.prize - self.contest.defense_cost * d;
                1.0 - (-self.risk_aversion * payoff).exp()
            })
            .collect())
    }
}

/// Attacker captures `theta * prize` and pays for its investment
#[derive(Debug, Clone)]
struct AttackerUtility {
    prize: f64,
    attack_cost: f64,
    risk_aversion: f64,
}

impl Utility for AttackerUtility {
    fn evaluate(&self, a: f64, theta: &[f64]) -> ara_mcmc::Result<Vec<f64>> {
        Ok(theta
            .iter()
            .map(|t| {
                let payoff = t * self.prize - self.attack_cost * a;
                1.0 - (-self.risk_aversion * payoff).exp()
            })
            .collect())
    }
}

/// Beta law of the attacker's share
///
/// `concentration` scales both parameters: above one the outcome is more
/// predictable, below one less.
#[derive(Debug, Clone)]
struct BetaOutcome {
    eps: f64,
    concentration: f64,
}

impl ProbabilityModel for BetaOutcome {
    fn sample(&self, d: f64, a: f64, size: usize, rng: &mut dyn RngCore) -> ara_mcmc::Result<Vec<f64>> {
        let alpha = (a - d + 1.0 + self.eps) * self.concentration;
        let beta = (d - a + 1.0 + self.eps) * self.concentration;
        let law = Beta::new(alpha, beta).map_err(|e| SolverError::Distribution(e.to_string()))?;
        Ok((0..size).map(|_| law.sample(rng)).collect())
    }
}

/// Defender's prior over the attacker's preferences
struct AttackerPreferences {
    contest: Contest,
}

impl UtilityPrior for AttackerPreferences {
    type Instance = AttackerUtility;

    fn draw(&self, rng: &mut dyn RngCore) -> AttackerUtility {
        AttackerUtility {
            prize: self.contest.prize,
            attack_cost: rng.gen_range(0.8..1.2) * self.contest.attack_cost,
            risk_aversion: rng.gen_range(0.05..0.15),
        }
    }
}

/// Defender's prior over the attacker's beliefs
struct AttackerBeliefs {
    contest: Contest,
}

impl ProbabilityPrior for AttackerBeliefs {
    type Instance = BetaOutcome;

    fn draw(&self, _defense: f64, rng: &mut dyn RngCore) -> BetaOutcome {
        BetaOutcome {
            eps: self.contest.eps,
            concentration: rng.gen_range(0.5..2.0),
        }
    }
}

fn main() -> Result<(), SolverError> {
    // Initialize logging
    env_logger::init();

    println!("Beta Contest Example");
    println!("====================");
    println!();

    let contest = Contest::default();
    let d_values = StrategyGrid::arange(0.0, 1.0, 0.1, "defender")?;
    let a_values = StrategyGrid::arange(0.0, 1.0, 0.1, "attacker")?;
    let law = BetaOutcome {
        eps: contest.eps,
        concentration: 1.0,
    };

    let defender = DecisionModel::new(
        DefenderUtility {
            contest,
            risk_aversion: 0.1,
        },
        law.clone(),
    );
    let attacker = DecisionModel::new(
        AttackerUtility {
            prize: contest.prize,
            attack_cost: contest.attack_cost,
            risk_aversion: 0.1,
        },
        law,
    );

    let config = SolverConfig::default()
        .with_mcmc_iters(2_000)
        .with_inner_mcmc_iters(2_000)
        .with_ara_iters(200)
        .with_n_jobs(0)
        .with_seed(1234);

    println!("Game theory");
    println!("{}", "-".repeat(40));
    let game = mcmc_adg(&d_values, &a_values, &defender, &attacker, &config)?;
    println!("Optimal defense: {:.2}", game.d_opt);
    for (d, a) in d_values.iter().zip(&game.a_opt) {
        println!("  d = {:.2} -> best attack {:.2}", d, a);
    }
    println!();

    println!("ARA");
    println!("{}", "-".repeat(40));
    let random_attacker = RandomDecisionModel::new(
        AttackerPreferences { contest },
        AttackerBeliefs { contest },
    );
    let ara = mcmc_ara(&d_values, &a_values, &defender, &random_attacker, &config)?;
    println!("Optimal defense: {:.2}", ara.d_opt);
    println!("Predictive attack distribution (rows: d, columns: a):");
    print!("{}", ara.p_a);

    Ok(())
}
