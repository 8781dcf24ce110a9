use async_trait::async_trait;
use owners_core::{CommitId, Owner, OwnershipRule, RepoId, RepoName, Ruleset, RulesetSource};
use owners_gitserver::GitBackend;
use owners_service::{
    IdentityBackend, IdentityMatch, OwnService, OwnershipError, PageArgs, ResolutionContext,
    Result, RulesetLoader,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

struct FakeGit {
    files: Vec<String>,
}

#[async_trait]
impl GitBackend for FakeGit {
    async fn fetch_archive(
        &self,
        _repo: &RepoName,
        _commit: &CommitId,
        _paths: &[String],
    ) -> owners_gitserver::Result<Vec<u8>> {
        Ok(Vec::new())
    }

    async fn read_file(
        &self,
        _repo: &RepoName,
        _commit: &CommitId,
        _path: &str,
    ) -> owners_gitserver::Result<Vec<u8>> {
        Ok(Vec::new())
    }

    async fn list_files(
        &self,
        _repo: &RepoName,
        _commit: &CommitId,
        _path_pattern: Option<&str>,
    ) -> owners_gitserver::Result<Vec<String>> {
        Ok(self.files.clone())
    }

    async fn diff_raw(
        &self,
        _repo: &RepoName,
        _commit_a: &CommitId,
        _commit_b: &CommitId,
    ) -> owners_gitserver::Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

struct FakeLoader {
    rules: Vec<OwnershipRule>,
    present: bool,
}

#[async_trait]
impl RulesetLoader for FakeLoader {
    async fn load_ruleset(
        &self,
        repo_id: RepoId,
        _repo_name: &RepoName,
        _commit: &CommitId,
    ) -> Result<Option<Ruleset>> {
        if !self.present {
            return Ok(None);
        }
        Ok(Some(Ruleset::with_glob_matcher(
            RulesetSource::Ingested { repo_id },
            self.rules.clone(),
        )?))
    }
}

struct EchoIdentities;

#[async_trait]
impl IdentityBackend for EchoIdentities {
    async fn lookup_identities(
        &self,
        owners: &[Owner],
        _ctx: &ResolutionContext,
    ) -> Result<Vec<IdentityMatch>> {
        Ok(owners
            .iter()
            .map(|o| IdentityMatch::Person {
                handle: o.handle.clone(),
                email: o.email.clone(),
            })
            .collect())
    }
}

fn rule(pattern: &str, line: i32, handles: &[&str]) -> OwnershipRule {
    OwnershipRule {
        pattern: pattern.to_string(),
        line_number: line,
        owners: handles.iter().map(|h| Owner::handle(*h)).collect(),
    }
}

fn service(files: &[&str], rules: Vec<OwnershipRule>, present: bool) -> OwnService {
    OwnService::new(
        Arc::new(FakeGit {
            files: files.iter().map(|f| f.to_string()).collect(),
        }),
        Arc::new(FakeLoader { rules, present }),
        Arc::new(EchoIdentities),
    )
}

fn repo() -> (RepoId, RepoName, CommitId) {
    (RepoId(1), RepoName::from("acme/widgets"), CommitId::from("c1"))
}

#[tokio::test]
async fn single_owner_owns_every_file() -> anyhow::Result<()> {
    let svc = service(
        &["a.go", "b.go", "c.go"],
        vec![rule("*.go", 1, &["alice"])],
        true,
    );
    let (repo_id, repo_name, commit) = repo();

    let page = svc
        .aggregate_owners(repo_id, &repo_name, &commit, &PageArgs::first(10))
        .await?;

    assert_eq!(page.owners.len(), 1);
    assert_eq!(page.owners[0].owner.display_text(), "alice");
    assert_eq!(page.owners[0].file_count, 3);
    assert_eq!(page.total_count, 1);
    assert!(!page.has_next_page);
    assert_eq!(page.next_cursor, None);
    Ok(())
}

#[tokio::test]
async fn full_page_is_sorted_by_descending_count() -> anyhow::Result<()> {
    let svc = service(
        &["a.go", "b.go", "docs/x.md", "docs/y.md", "docs/z.md", "main.rs"],
        vec![
            rule("*.go", 1, &["alice"]),
            rule("docs/", 2, &["bob"]),
            rule("*.rs", 3, &["carol"]),
        ],
        true,
    );
    let (repo_id, repo_name, commit) = repo();

    let page = svc
        .aggregate_owners(repo_id, &repo_name, &commit, &PageArgs::first(10))
        .await?;

    let counts: Vec<(String, u64)> = page
        .owners
        .iter()
        .map(|o| (o.owner.display_text().to_string(), o.file_count))
        .collect();
    assert_eq!(
        counts,
        vec![
            ("bob".to_string(), 3),
            ("alice".to_string(), 2),
            ("carol".to_string(), 1),
        ]
    );
    assert_eq!(page.total_count, 3);
    assert!(!page.has_next_page);
    Ok(())
}

#[tokio::test]
async fn pages_concatenate_to_the_full_aggregate_for_any_page_size() -> anyhow::Result<()> {
    let files = [
        "a.go", "b.go", "c.go", "d.go", "docs/a.md", "docs/b.md", "api/x.yml", "main.rs",
        "lib.rs", "Makefile",
    ];
    let rules = vec![
        rule("*.go", 1, &["alice", "bob"]),
        rule("docs/", 2, &["carol"]),
        rule("*.yml", 3, &["dave"]),
        rule("*.rs", 4, &["erin", "frank"]),
        rule("Makefile", 5, &["grace"]),
    ];
    let svc = service(&files, rules, true);
    let (repo_id, repo_name, commit) = repo();

    let full = svc
        .aggregate_owners(repo_id, &repo_name, &commit, &PageArgs::first(100))
        .await?;
    let all: Vec<String> = full.owners.iter().map(|o| o.sort_key.clone()).collect();
    assert_eq!(full.total_count, all.len());

    for page_size in 1..=full.total_count {
        let mut collected = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = svc
                .aggregate_owners(
                    repo_id,
                    &repo_name,
                    &commit,
                    &PageArgs {
                        first: page_size,
                        after: cursor.clone(),
                    },
                )
                .await?;
            assert_eq!(page.total_count, full.total_count);
            collected.extend(page.owners.iter().map(|o| o.sort_key.clone()));
            if !page.has_next_page {
                break;
            }
            cursor = page.next_cursor.clone();
            assert!(cursor.is_some());
        }
        assert_eq!(collected, all, "page size {page_size} loses or reorders owners");
    }
    Ok(())
}

#[tokio::test]
async fn stale_cursor_falls_back_to_the_first_page() -> anyhow::Result<()> {
    let svc = service(
        &["a.go", "docs/x.md"],
        vec![rule("*.go", 1, &["alice"]), rule("docs/", 2, &["bob"])],
        true,
    );
    let (repo_id, repo_name, commit) = repo();

    let fresh = svc
        .aggregate_owners(repo_id, &repo_name, &commit, &PageArgs::first(1))
        .await?;
    let stale = svc
        .aggregate_owners(
            repo_id,
            &repo_name,
            &commit,
            &PageArgs::after(1, "who-is-this"),
        )
        .await?;
    assert_eq!(fresh, stale);
    Ok(())
}

#[tokio::test]
async fn missing_ruleset_aggregates_to_nothing() -> anyhow::Result<()> {
    let svc = service(&["a.go"], Vec::new(), false);
    let (repo_id, repo_name, commit) = repo();

    let page = svc
        .aggregate_owners(repo_id, &repo_name, &commit, &PageArgs::first(10))
        .await?;
    assert!(page.owners.is_empty());
    assert_eq!(page.total_count, 0);
    assert!(!page.has_next_page);
    Ok(())
}

#[tokio::test]
async fn aggregate_page_serializes_for_the_wire() -> anyhow::Result<()> {
    let svc = service(&["a.go"], vec![rule("*.go", 1, &["alice"])], true);
    let (repo_id, repo_name, commit) = repo();

    let page = svc
        .aggregate_owners(repo_id, &repo_name, &commit, &PageArgs::first(10))
        .await?;
    let json = serde_json::to_value(&page)?;
    assert_eq!(json["total_count"], serde_json::json!(1));
    assert_eq!(json["owners"][0]["file_count"], serde_json::json!(1));
    assert_eq!(json["owners"][0]["owner"]["kind"], serde_json::json!("person"));
    assert_eq!(json["owners"][0]["example"]["line_number"], serde_json::json!(1));
    Ok(())
}

#[tokio::test]
async fn file_ownership_lists_the_winning_rule_owners() -> anyhow::Result<()> {
    let svc = service(
        &[],
        vec![
            rule("*.go", 1, &["zoe", "amy", "bob"]),
            rule("docs/", 2, &["carol"]),
        ],
        true,
    );
    let (repo_id, repo_name, commit) = repo();

    let first = svc
        .file_ownership(repo_id, &repo_name, &commit, "pkg/util.go", &PageArgs::first(2))
        .await?;
    assert_eq!(first.total_count, 3);
    assert_eq!(
        first
            .owners
            .iter()
            .map(|o| o.owner.display_text().to_string())
            .collect::<Vec<_>>(),
        vec!["amy".to_string(), "bob".to_string()]
    );
    assert!(first.has_next_page);

    let rest = svc
        .file_ownership(
            repo_id,
            &repo_name,
            &commit,
            "pkg/util.go",
            &PageArgs {
                first: 2,
                after: first.next_cursor.clone(),
            },
        )
        .await?;
    assert_eq!(
        rest.owners
            .iter()
            .map(|o| o.owner.display_text().to_string())
            .collect::<Vec<_>>(),
        vec!["zoe".to_string()]
    );
    assert!(!rest.has_next_page);
    assert_eq!(rest.owners[0].reason.line_number, 1);
    Ok(())
}

#[tokio::test]
async fn file_ownership_of_unmatched_path_is_empty() -> anyhow::Result<()> {
    let svc = service(&[], vec![rule("*.go", 1, &["alice"])], true);
    let (repo_id, repo_name, commit) = repo();

    let ownership = svc
        .file_ownership(repo_id, &repo_name, &commit, "README.md", &PageArgs::first(5))
        .await?;
    assert_eq!(ownership.total_count, 0);
    assert!(ownership.owners.is_empty());
    Ok(())
}

#[tokio::test]
async fn filter_inputs_resolve_with_any_for_blank() -> anyhow::Result<()> {
    let svc = service(&[], Vec::new(), true);
    let resolved = svc
        .resolve_filter_inputs(&[
            "@Alice".to_string(),
            String::new(),
            "bob@example.com".to_string(),
        ])
        .await?;
    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved[0].display_text(), "alice");
    assert_eq!(resolved[1], owners_core::ResolvedOwner::Any);
    assert_eq!(resolved[2].display_text(), "bob@example.com");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_callers_share_one_cache() {
    let svc = Arc::new(service(&[], vec![rule("*.go", 1, &["alice"])], true));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move { svc.ownership_cache() }));
    }

    let mut caches = Vec::new();
    for handle in handles {
        caches.push(handle.await.expect("join"));
    }
    for cache in &caches {
        assert!(Arc::ptr_eq(cache, &caches[0]));
    }
}

#[tokio::test]
async fn git_failure_fails_the_aggregate_request() {
    struct BrokenGit;

    #[async_trait]
    impl GitBackend for BrokenGit {
        async fn fetch_archive(
            &self,
            _repo: &RepoName,
            _commit: &CommitId,
            _paths: &[String],
        ) -> owners_gitserver::Result<Vec<u8>> {
            Err(owners_gitserver::GitError::Backend("down".to_string()))
        }

        async fn read_file(
            &self,
            _repo: &RepoName,
            _commit: &CommitId,
            _path: &str,
        ) -> owners_gitserver::Result<Vec<u8>> {
            Err(owners_gitserver::GitError::Backend("down".to_string()))
        }

        async fn list_files(
            &self,
            _repo: &RepoName,
            _commit: &CommitId,
            _path_pattern: Option<&str>,
        ) -> owners_gitserver::Result<Vec<String>> {
            Err(owners_gitserver::GitError::Backend("down".to_string()))
        }

        async fn diff_raw(
            &self,
            _repo: &RepoName,
            _commit_a: &CommitId,
            _commit_b: &CommitId,
        ) -> owners_gitserver::Result<Vec<u8>> {
            Err(owners_gitserver::GitError::Backend("down".to_string()))
        }
    }

    let svc = OwnService::new(
        Arc::new(BrokenGit),
        Arc::new(FakeLoader {
            rules: vec![rule("*.go", 1, &["alice"])],
            present: true,
        }),
        Arc::new(EchoIdentities),
    );
    let (repo_id, repo_name, commit) = repo();

    let err = svc
        .aggregate_owners(repo_id, &repo_name, &commit, &PageArgs::first(10))
        .await
        .unwrap_err();
    assert!(matches!(err, OwnershipError::Git(_)));
}
