// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use url::ParseError;
use url::Url;

/// Split a path into its directory and basename at the last `/`.
///
/// A path without `/` has an empty directory.
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => ("", path),
    }
}

/// Join a directory and a basename; an empty directory yields the basename alone.
pub fn join_path(dir: &str, file: &str) -> String {
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{dir}/{file}")
    }
}

/// Strip the leading directory segments shared by every path.
///
/// URLs contribute their path component. The longest directory is the reference; for each of
/// its segments in turn, if every path's next remaining segment equals it, that segment is
/// removed from all paths at once. Basenames are never touched.
///
/// The paths are returned unchanged when there are fewer than two of them, when nothing is
/// shared, or when any of them is not a well-formed URL or path.
///
/// ```
/// use stacklog::stack::compact_paths;
///
/// assert_eq!(compact_paths(&["/a/b/c.js", "/a/b/d.js"]), ["c.js", "d.js"]);
/// assert_eq!(compact_paths(&["/a/b/c.js", "/x/y/d.js"]), ["/a/b/c.js", "/x/y/d.js"]);
/// ```
pub fn compact_paths<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    let unchanged = || paths.iter().map(|p| p.as_ref().to_string()).collect();
    if paths.len() < 2 {
        return unchanged();
    }

    let mut pieces = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(path) = path_component(path.as_ref()) else {
            return unchanged();
        };
        let (dir, file) = split_path(&path);
        let segments = dir
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        pieces.push((segments, file.to_string()));
    }

    let mut reference: &[String] = &[];
    for (segments, _) in &pieces {
        if segments.len() > reference.len() {
            reference = segments;
        }
    }

    // segments are removed in lock-step, so one offset tracks every path
    let mut offset = 0;
    for segment in reference {
        if pieces
            .iter()
            .all(|(segments, _)| segments.get(offset) == Some(segment))
        {
            offset += 1;
        }
    }
    if offset == 0 {
        return unchanged();
    }

    pieces
        .iter()
        .map(|(segments, file)| join_path(&segments[offset..].join("/"), file))
        .collect()
}

fn path_component(path: &str) -> Option<String> {
    match Url::parse(path) {
        Ok(url) => Some(url.path().to_string()),
        Err(ParseError::RelativeUrlWithoutBase) => Some(path.to_string()),
        Err(_) => None,
    }
}
