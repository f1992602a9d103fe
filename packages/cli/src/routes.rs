// ABOUTME: App route table and the sign-in guard
// ABOUTME: Unknown paths fall back to sign-in, never to an error page

/// Every navigable destination of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SignUp,
    SignIn,
    Dashboard,
    QualityLessonLearned,
    LlcNew,
    LlcEdit(i64),
    PmReview(i64),
    FinalReview(i64),
    DepReview(i64),
}

impl Route {
    /// Parse a path. Anything unrecognized resolves to sign-in.
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["signup"] => Route::SignUp,
            ["signin"] | [""] => Route::SignIn,
            ["dashboard"] => Route::Dashboard,
            ["qualityLessonLearned"] => Route::QualityLessonLearned,
            ["llc", "new"] => Route::LlcNew,
            ["llc", id, "edit"] => match id.parse() {
                Ok(id) => Route::LlcEdit(id),
                Err(_) => Route::SignIn,
            },
            ["pm-review", id] => match id.parse() {
                Ok(id) => Route::PmReview(id),
                Err(_) => Route::SignIn,
            },
            ["final-review", id] => match id.parse() {
                Ok(id) => Route::FinalReview(id),
                Err(_) => Route::SignIn,
            },
            ["dep-review", id] => match id.parse() {
                Ok(id) => Route::DepReview(id),
                Err(_) => Route::SignIn,
            },
            _ => Route::SignIn,
        }
    }

    /// The review pages authenticate with their link token instead of a
    /// session, so they stay reachable while signed out.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Route::SignIn
                | Route::SignUp
                | Route::PmReview(_)
                | Route::FinalReview(_)
                | Route::DepReview(_)
        )
    }

    /// Apply the sign-in guard: protected routes bounce to sign-in for
    /// anonymous visitors.
    pub fn resolve(self, signed_in: bool) -> Route {
        if self.requires_auth() && !signed_in {
            Route::SignIn
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("/signup", Route::SignUp)]
    #[case("/signin", Route::SignIn)]
    #[case("/dashboard", Route::Dashboard)]
    #[case("/qualityLessonLearned", Route::QualityLessonLearned)]
    #[case("/llc/new", Route::LlcNew)]
    #[case("/llc/42/edit", Route::LlcEdit(42))]
    #[case("/pm-review/7", Route::PmReview(7))]
    #[case("/final-review/7", Route::FinalReview(7))]
    #[case("/dep-review/12", Route::DepReview(12))]
    fn known_paths_parse(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(Route::parse(path), expected);
    }

    #[rstest]
    #[case("/")]
    #[case("/nope")]
    #[case("/llc/abc/edit")]
    #[case("/pm-review/xyz")]
    #[case("/llc/42/edit/extra")]
    fn unknown_paths_fall_back_to_sign_in(#[case] path: &str) {
        assert_eq!(Route::parse(path), Route::SignIn);
    }

    #[test]
    fn guard_bounces_anonymous_visitors_off_protected_routes() {
        assert_eq!(Route::Dashboard.resolve(false), Route::SignIn);
        assert_eq!(Route::LlcEdit(1).resolve(false), Route::SignIn);
        assert_eq!(Route::Dashboard.resolve(true), Route::Dashboard);
    }

    #[test]
    fn review_links_work_while_signed_out() {
        assert_eq!(Route::PmReview(7).resolve(false), Route::PmReview(7));
        assert_eq!(Route::DepReview(3).resolve(false), Route::DepReview(3));
        assert_eq!(Route::SignUp.resolve(false), Route::SignUp);
    }
}
