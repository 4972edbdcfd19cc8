/*
 * aurbump - Automated AUR package publisher for upstream GitHub releases.
 * Copyright (C) 2025  aurbump contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

//! Version-tag normalization for the update gate.

/// Strip at most one leading `v`/`V` tag prefix.
///
/// `v1.2.3` and `1.2.3` normalize to the same string; `vv1.2.3` keeps one
/// prefix character.
pub fn normalized(tag: &str) -> &str {
    tag.strip_prefix(['v', 'V']).unwrap_or(tag)
}

/// Gate predicate: true when both tags refer to the same release.
pub fn is_same_release(current: &str, latest: &str) -> bool {
    normalized(current) == normalized(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_stripping() {
        assert_eq!(normalized("v1.2.3"), "1.2.3");
        assert_eq!(normalized("V1.2.3"), "1.2.3");
        assert_eq!(normalized("1.2.3"), "1.2.3");
        assert_eq!(normalized("vv1.2.3"), "v1.2.3");
    }

    #[test]
    fn test_same_release() {
        assert!(is_same_release("v1.2.3", "1.2.3"));
        assert!(is_same_release("1.2.3", "v1.2.3"));
        assert!(is_same_release("v1.2.3", "v1.2.3"));
        assert!(is_same_release("1.2.3", "1.2.3"));
    }

    #[test]
    fn test_different_release() {
        assert!(!is_same_release("1.2.3", "1.2.30"));
        assert!(!is_same_release("v1.0.0", "v1.1.0"));
        assert!(!is_same_release("", "v1.0.0"));
    }
}
