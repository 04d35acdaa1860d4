use crate::sass::indentation::*;
use crate::sass::options::SassAstOptions;

#[test]
fn test_distance_counts_spaces_and_tabs() {
    assert_eq!(distance("", 2), 0);
    assert_eq!(distance(".class", 2), 0);
    assert_eq!(distance("    color: red", 2), 4);
    assert_eq!(distance("\tcolor: red", 4), 4);
    assert_eq!(distance("\t  color: red", 4), 6);
    // Stops at the first non whitespace character
    assert_eq!(distance("  a  b", 2), 2);
    // Whitespace only lines count all of it
    assert_eq!(distance("   ", 2), 3);
}

#[test]
fn test_distance_reversed() {
    assert_eq!(distance_reversed("color: red", 2), 0);
    assert_eq!(distance_reversed("color: red  ", 2), 2);
    assert_eq!(distance_reversed("color: red\t", 4), 4);
}

#[test]
fn test_level_rounds() {
    assert_eq!(level(0, 2), 0);
    assert_eq!(level(2, 2), 1);
    assert_eq!(level(1, 2), 1);
    assert_eq!(level(3, 2), 2);
    assert_eq!(level(4, 4), 1);
    assert_eq!(level(1, 4), 0);
    // A zero tab size must not divide by zero
    assert_eq!(level(3, 0), 3);
}

#[test]
fn test_offset_to_normalize_zero_distance() {
    assert_eq!(offset_to_normalize(0, 2, 0, false), 0);
    assert_eq!(offset_to_normalize(0, 2, 8, true), 0);
}

#[test]
fn test_offset_to_normalize_snaps_to_tab_stop() {
    // 3 columns with tab size 2 is exactly half way, it snaps down to 2
    assert_eq!(offset_to_normalize(3, 2, 4, false), -1);
    // 5 columns with tab size 4 snaps down to 4
    assert_eq!(offset_to_normalize(5, 4, 8, false), -1);
    // 7 columns with tab size 4 snaps up to 8
    assert_eq!(offset_to_normalize(7, 4, 8, false), 1);
    // Already on a tab stop
    assert_eq!(offset_to_normalize(4, 2, 4, false), 0);
}

#[test]
fn test_offset_to_normalize_clamps_to_baseline() {
    // Header indented 6 columns but the deepest valid column is 2
    assert_eq!(offset_to_normalize(6, 2, 2, false), -4);
    // A reset keeps the snapped target
    assert_eq!(offset_to_normalize(6, 2, 2, true), 0);
}

#[test]
fn test_offset_to_normalize_is_stable() {
    // Applying the offset once more must not move the line again
    for tab_size in 1..=4 {
        for baseline in (0..=12).step_by(tab_size) {
            for distance in 0..=12usize {
                let offset = offset_to_normalize(distance, tab_size, baseline, false);
                let moved = (distance as isize + offset) as usize;
                assert_eq!(
                    offset_to_normalize(moved, tab_size, baseline, false),
                    0,
                    "distance {} tab {} baseline {}",
                    distance,
                    tab_size,
                    baseline
                );
            }
        }
    }
}

#[test]
fn test_indentation_offset() {
    let result = indentation_offset("    color: red", 2, 2);
    assert_eq!(result, IndentationOffset { offset: -2, distance: 4 });

    let result = indentation_offset("color: red", 4, 2);
    assert_eq!(result, IndentationOffset { offset: 4, distance: 0 });
}

#[test]
fn test_render_indentation() {
    let spaces = SassAstOptions::new(2, true);
    assert_eq!(render_indentation(4, &spaces), "    ");

    let tabs = SassAstOptions::new(2, false);
    assert_eq!(render_indentation(4, &tabs), "\t\t");
    assert_eq!(render_indentation(5, &tabs), "\t\t ");

    assert_eq!(indentation_for_level(2, &spaces), "    ");
    assert_eq!(indentation_for_level(2, &tabs), "\t\t");
}
