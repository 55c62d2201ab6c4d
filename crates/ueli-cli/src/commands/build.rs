use ueli_cloud::ShellExecutor;
use ueli_core::tag;

use super::Context;
use crate::output::{self, PreconditionFailed};

/// Build the image for the current branch and commit.
pub async fn build<E: ShellExecutor>(
    ctx: &Context<E>,
    force: bool,
    tag_override: Option<&str>,
) -> anyhow::Result<()> {
    let git = ctx.client.git_info().await?;
    let build_tag =
        tag::build_tag_with_override(ctx.service(), &git.branch, &git.commit, tag_override);

    if !git.clean && !force {
        return Err(PreconditionFailed(
            "Repository is not clean. Clean up or use `--force` if you know what you're doing."
                .to_owned(),
        )
        .into());
    }

    output::heading(&format!("Building image '{build_tag}'"));
    output::confirm_or_abort("Do you want to continue?", ctx.assume_yes)?;

    ctx.client
        .build_image(&build_tag, &ctx.config.build.context)
        .await?;

    println!("Done!");
    Ok(())
}

/// Tag the current build for the registry and push it.
pub async fn push<E: ShellExecutor>(ctx: &Context<E>, tag_override: Option<&str>) -> anyhow::Result<()> {
    let git = ctx.client.git_info().await?;
    let build_tag =
        tag::build_tag_with_override(ctx.service(), &git.branch, &git.commit, tag_override);

    let gcloud = &ctx.config.gcloud;
    let remote = tag::remote(&gcloud.registry, &gcloud.project);

    output::heading(&format!("Pushing '{build_tag}' to '{remote}'"));
    output::confirm_or_abort("Do you want to continue?", ctx.assume_yes)?;

    let remote_tag = tag::remote_tag(&remote, &build_tag);
    ctx.client.tag_image(&build_tag, &remote_tag).await?;
    ctx.client.push_image(&remote_tag).await?;

    println!("Done!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{MockExecutor, config, context};
    use mockall::Sequence;

    fn expect_git(mock: &mut MockExecutor, porcelain: &'static str) {
        mock.expect_exec()
            .withf(|cmd| cmd == "git rev-parse --abbrev-ref HEAD")
            .returning(|_| Ok("master\n".to_owned()));
        mock.expect_exec()
            .withf(|cmd| cmd == "git rev-parse --short --verify master")
            .returning(|_| Ok("abc1234\n".to_owned()));
        mock.expect_exec()
            .withf(|cmd| cmd == "git status --porcelain")
            .returning(move |_| Ok(porcelain.to_owned()));
    }

    #[tokio::test]
    async fn build_refuses_dirty_tree() {
        let mut mock = MockExecutor::new();
        expect_git(&mut mock, " M src/lib.rs\n");
        mock.expect_exec_streaming().never();

        let tmp = tempfile::TempDir::new().unwrap();
        let ctx = context(config(vec![]), mock, tmp.path());
        let err = build(&ctx, false, None).await.unwrap_err();

        assert!(err.to_string().contains("not clean"));
        assert!(err.downcast_ref::<PreconditionFailed>().is_some());
    }

    #[tokio::test]
    async fn build_forced_on_dirty_tree() {
        let mut mock = MockExecutor::new();
        expect_git(&mut mock, " M src/lib.rs\n");
        mock.expect_exec_streaming()
            .withf(|cmd| cmd == "docker build --tag svc:master.abc1234 source --quiet=true")
            .times(1)
            .returning(|_| Ok(()));

        let tmp = tempfile::TempDir::new().unwrap();
        let ctx = context(config(vec![]), mock, tmp.path());
        build(&ctx, true, None).await.unwrap();
    }

    #[tokio::test]
    async fn push_tags_then_pushes() {
        let mut mock = MockExecutor::new();
        expect_git(&mut mock, "");

        let mut seq = Sequence::new();
        mock.expect_exec_streaming()
            .withf(|cmd| cmd == "docker tag svc:v2 eu.gcr.io/flatfox/svc:v2")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        mock.expect_exec_streaming()
            .withf(|cmd| cmd == "gcloud docker -- push eu.gcr.io/flatfox/svc:v2")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let tmp = tempfile::TempDir::new().unwrap();
        let ctx = context(config(vec![]), mock, tmp.path());
        push(&ctx, Some("v2")).await.unwrap();
    }
}
