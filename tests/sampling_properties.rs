//! Property-based tests of version-space sampling.
//!
//! Labels are generated from a hidden linear classifier, so the version
//! space always has a non-empty interior.

use proptest::prelude::*;

use versionspace::{
    constraint_matrix, Config, ConvexBody, HitAndRunChain, Label, LabeledPoint,
    LinearVersionSpace, MarkovChain, Manifold, DirectionSampler, UnitBallPolyhedralCone,
    UnitSpherePolyhedralCone, Vector,
};

/// Labeled points from a hidden classifier through the origin.
///
/// Points too close to the hidden boundary are dropped so the version space
/// is not degenerate.
fn labeled_data(dim: usize) -> impl Strategy<Value = Vec<LabeledPoint>> {
    (
        prop::collection::vec(-1.0f64..1.0, dim),
        prop::collection::vec(prop::collection::vec(-1.0f64..1.0, dim), 1..8),
    )
        .prop_map(|(hidden, points)| {
            let hidden = Vector::from_vec(hidden);
            points
                .into_iter()
                .map(Vector::from_vec)
                .filter(|x| hidden.dot(x).abs() > 0.05)
                .map(|x| {
                    let label = Label::from_margin(hidden.dot(&x));
                    LabeledPoint::new(x, label)
                })
                .collect::<Vec<_>>()
        })
        .prop_filter("need at least one labeled point", |points| !points.is_empty())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every hypothesis classifies all training points correctly
    #[test]
    fn prop_hypotheses_are_consistent(labels in labeled_data(3)) {
        let config = Config::quick().add_intercept(false);
        let mut space = LinearVersionSpace::new(config).unwrap();
        let vote = space.sample(&labels, 5).unwrap();

        for i in 0..vote.num_hypotheses() {
            let classifier = vote.classifier(i).unwrap();
            for p in &labels {
                prop_assert_eq!(classifier.predict(&p.features).unwrap(), p.label);
            }
        }
    }

    /// Chain states never leave the ball body
    #[test]
    fn prop_ball_chain_stays_inside(labels in labeled_data(2), seed in any::<u64>()) {
        let body = UnitBallPolyhedralCone::with_default_solver(
            constraint_matrix(&labels, false).unwrap(),
        ).unwrap();
        let sampler = DirectionSampler::random(Manifold::Euclidean);
        let start = body.interior_point().unwrap();
        let mut chain = HitAndRunChain::new(&body, &sampler, start, seed).unwrap();
        for _ in 0..30 {
            let p = chain.advance(1).unwrap();
            prop_assert!(body.is_inside(&p), "{} left the body", p);
        }
    }

    /// Chain states never leave the sphere body
    #[test]
    fn prop_sphere_chain_stays_inside(labels in labeled_data(3), seed in any::<u64>()) {
        let body = UnitSpherePolyhedralCone::with_default_solver(
            constraint_matrix(&labels, false).unwrap(),
        ).unwrap();
        let sampler = DirectionSampler::random(Manifold::UnitSphere);
        let start = body.interior_point().unwrap();
        let mut chain = HitAndRunChain::new(&body, &sampler, start, seed).unwrap();
        for _ in 0..30 {
            let p = chain.advance(1).unwrap();
            prop_assert!(body.is_inside(&p), "{} left the body", p);
        }
    }
}
