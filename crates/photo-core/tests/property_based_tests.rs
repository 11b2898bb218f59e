//! Property-Based Tests
//!
//! Invariants of the placement geometry explored with proptest:
//! - Scaling is component-wise multiplication
//! - Fit stays inside the target box, fill covers it, both keep aspect ratio
//! - Stretch returns the box exactly
//! - Center anchor is symmetric on both axes
//! - Resolution is deterministic
//! - Quarter-turn drawing keeps proportions and stays inside the placed rect

use photo_core::{
    compute_placement, resolve_position, resolve_size, Anchor, Dimensions, FitMode, PageFrame,
    PositionDirective, Rotation, SizeDirective,
};
use proptest::prelude::*;

const REL_EPS: f64 = 1e-9;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= REL_EPS * a.abs().max(b.abs()).max(1.0)
}

fn side() -> impl Strategy<Value = f64> {
    1.0f64..5000.0
}

// ============================================================================
// Size Properties
// ============================================================================

#[test]
fn proptest_scale_is_componentwise() {
    proptest!(|(w in side(), h in side(), factor in 0.01f64..10.0)| {
        let original = Dimensions::new(w, h).unwrap();
        for mode in [FitMode::Fit, FitMode::Fill, FitMode::Stretch] {
            let size = resolve_size(original, SizeDirective::Scale(factor), mode).unwrap();
            prop_assert_eq!(size.width(), w * factor);
            prop_assert_eq!(size.height(), h * factor);
        }
    });
}

#[test]
fn proptest_fit_within_and_fill_covers() {
    proptest!(|(w in side(), h in side(), tw in side(), th in side())| {
        let original = Dimensions::new(w, h).unwrap();
        let directive = SizeDirective::Explicit { width: tw, height: th };

        let fit = resolve_size(original, directive, FitMode::Fit).unwrap();
        prop_assert!(fit.width() <= tw * (1.0 + REL_EPS));
        prop_assert!(fit.height() <= th * (1.0 + REL_EPS));
        prop_assert!(close(fit.width(), tw) || close(fit.height(), th));
        prop_assert!(close(fit.aspect_ratio(), original.aspect_ratio()));

        let fill = resolve_size(original, directive, FitMode::Fill).unwrap();
        prop_assert!(fill.width() >= tw * (1.0 - REL_EPS));
        prop_assert!(fill.height() >= th * (1.0 - REL_EPS));
        prop_assert!(close(fill.aspect_ratio(), original.aspect_ratio()));
    });
}

#[test]
fn proptest_stretch_is_exact() {
    proptest!(|(w in side(), h in side(), tw in side(), th in side())| {
        let original = Dimensions::new(w, h).unwrap();
        let directive = SizeDirective::Explicit { width: tw, height: th };
        let size = resolve_size(original, directive, FitMode::Stretch).unwrap();
        prop_assert_eq!(size.width(), tw);
        prop_assert_eq!(size.height(), th);
    });
}

#[test]
fn proptest_resolution_is_deterministic() {
    proptest!(|(w in side(), h in side(), tw in side(), th in side())| {
        let original = Dimensions::new(w, h).unwrap();
        let directive = SizeDirective::Explicit { width: tw, height: th };
        for mode in [FitMode::Fit, FitMode::Fill, FitMode::Stretch] {
            let a = resolve_size(original, directive, mode).unwrap();
            let b = resolve_size(original, directive, mode).unwrap();
            prop_assert_eq!(a.width().to_bits(), b.width().to_bits());
            prop_assert_eq!(a.height().to_bits(), b.height().to_bits());
        }
    });
}

// ============================================================================
// Position Properties
// ============================================================================

#[test]
fn proptest_center_is_symmetric() {
    proptest!(|(pw in side(), ph in side(), w in side(), h in side(), margin in 0.0f64..100.0)| {
        let page = PageFrame::new(pw, ph).unwrap();
        let size = Dimensions::new(w, h).unwrap();
        let directive = PositionDirective::Named { anchor: Anchor::Center, margin };
        let origin = resolve_position(page, size, directive);
        prop_assert!(close(origin.x + w / 2.0, pw / 2.0));
        prop_assert!(close(origin.y + h / 2.0, ph / 2.0));
    });
}

#[test]
fn proptest_corner_anchors_respect_margin() {
    proptest!(|(w in 1.0f64..200.0, h in 1.0f64..200.0, margin in 0.0f64..50.0)| {
        let page = PageFrame::A4;
        let size = Dimensions::new(w, h).unwrap();
        for anchor in [Anchor::TopLeft, Anchor::TopRight, Anchor::BottomLeft, Anchor::BottomRight] {
            let placement = compute_placement(
                page,
                size,
                SizeDirective::Scale(1.0),
                FitMode::Fit,
                PositionDirective::Named { anchor, margin },
            ).unwrap();
            let rect = placement.rect();
            let left_gap = rect.x0;
            let right_gap = page.width() - rect.x1;
            let bottom_gap = rect.y0;
            let top_gap = page.height() - rect.y1;
            prop_assert!(close(left_gap, margin) || close(right_gap, margin));
            prop_assert!(close(bottom_gap, margin) || close(top_gap, margin));
        }
    });
}

// ============================================================================
// Drawing Matrix Properties
// ============================================================================

#[test]
fn proptest_quarter_turns_keep_proportions_inside_rect() {
    proptest!(|(w in side(), h in side(), x in 0.0f64..500.0, y in 0.0f64..500.0)| {
        let placement = compute_placement(
            PageFrame::A4,
            Dimensions::new(w, h).unwrap(),
            SizeDirective::Scale(0.1),
            FitMode::Fit,
            PositionDirective::Explicit { x, y },
        ).unwrap();
        let rect = placement.rect();
        let slack = REL_EPS * rect.x1.max(rect.y1).max(1.0);
        for rotation in [Rotation::R90, Rotation::R270] {
            let m = placement.transform(rotation, FitMode::Fit);
            let drawn_w = m[0].hypot(m[1]);
            let drawn_h = m[2].hypot(m[3]);
            prop_assert!(close(drawn_w / drawn_h, w / h));

            for (u, v) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)] {
                let px = m[0] * u + m[2] * v + m[4];
                let py = m[1] * u + m[3] * v + m[5];
                prop_assert!(px >= rect.x0 - slack && px <= rect.x1 + slack);
                prop_assert!(py >= rect.y0 - slack && py <= rect.y1 + slack);
            }
        }
    });
}
