use crate::{
    bench::format_elapsed,
    client::{self, ApiClient},
    configuration::Configuration,
    SmokebenchError,
};
use std::{
    io::{BufRead, Write},
    thread,
    time::{Duration, Instant},
};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub username: String,
    pub password: String,
    pub posts: usize,
    pub pause: Duration,
}

impl From<&Configuration> for SessionPlan {
    fn from(config: &Configuration) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            posts: config.posts,
            pause: config.pause(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub session_id: String,
    pub posted: usize,
}

/// Log in, then post each line read from `input` as an article until `plan.posts` or end of input.
pub fn run_session<W: Write, R: BufRead>(
    api: &mut ApiClient<W>,
    plan: &SessionPlan,
    mut input: R,
) -> Result<SessionReport, SmokebenchError> {
    let start = Instant::now();
    let login = api.login(&plan.username, &plan.password)?;
    let session_id = client::session_id(&login)?;
    info!(username = %plan.username, "logged in");

    let mut posted = 0;
    let mut line = String::new();
    while posted < plan.posts {
        write!(api.output(), ">>> ")
            .and_then(|_| api.output().flush())
            .map_err(client::write_failed)?;
        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|e| SmokebenchError::new(format!("cannot read from the console: {e}")))?;
        if read == 0 {
            warn!(posted, "input closed before all posts were sent");
            break;
        }
        let content = line.trim_end_matches(['\r', '\n']);
        api.post_article(&session_id, content)?;
        posted += 1;
        info!(posted, "article posted");
        thread::sleep(plan.pause);
    }

    writeln!(
        api.output(),
        "{posted} posts sent: Time taken: {}, with {}s pause after each post.",
        format_elapsed(start.elapsed()),
        plan.pause.as_secs_f64()
    )
    .map_err(client::write_failed)?;
    Ok(SessionReport { session_id, posted })
}
