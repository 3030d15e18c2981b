//! Review directives attached to an upload push.

use crate::cli::UploadArgs;

/// Directives for the review server, in push order.
///
/// `--auto-submit` also starts a commit-queue dry run.
pub fn push_directives(args: &UploadArgs) -> Vec<String> {
    let mut directives = Vec::new();
    if args.auto_submit {
        directives.push("l=Auto-Submit+1".to_string());
    }
    if args.auto_submit || args.try_run {
        directives.push("l=Commit-Queue+1".to_string());
    }
    if args.submit {
        directives.push("l=Commit-Queue+2".to_string());
    }
    if let Some(reviewer) = &args.reviewer {
        directives.push(format!("r={}", reviewer));
    }
    directives
}

/// `HEAD:refs/for/<main_branch>`, with `%<directives>` when there are any.
pub fn push_refspec(main_branch: &str, directives: &[String]) -> String {
    let target = format!("HEAD:refs/for/{}", main_branch);
    if directives.is_empty() {
        target
    } else {
        format!("{}%{}", target, directives.join(","))
    }
}
