use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::RangeSpec;
use crate::page::Page;
use crate::sampler::generate_batch;
use crate::stat::Stat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `{wei, ether},`
    Plain,
    /// `{"wei", "ether"},`
    Quoted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub wei: String,
    pub ether: String,
}

impl TestCase {
    pub fn line(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Plain => format!("{{{}, {}}},", self.wei, self.ether),
            OutputFormat::Quoted => format!("{{\"{}\", \"{}\"}},", self.wei, self.ether),
        }
    }
}

pub struct Runner<T>
where
    T: Page + Send + Sync,
{
    page: T,
    ranges: Vec<RangeSpec>,
    delay: Duration,
    format: OutputFormat,
    seed: Option<u64>,
    header: bool,
    running: Arc<AtomicBool>,
    stat: Stat,
}

impl<T> Runner<T>
where
    T: Page + Send + Sync,
{
    pub fn new(
        page: T,
        ranges: &[RangeSpec],
        delay: Duration,
        format: OutputFormat,
        seed: Option<u64>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            page,
            ranges: ranges.to_vec(),
            delay,
            format,
            seed,
            header: false,
            running,
            stat: Stat::new(),
        }
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn stat(&self) -> &Stat {
        &self.stat
    }

    /// Writes to stdout, which is locked per line rather than for the run.
    pub async fn run(&self) -> Result<Vec<TestCase>, String> {
        let mut out = std::io::stdout();
        self.run_with(&mut out).await
    }

    /// Feeds every sample through the page and writes one line per case.
    ///
    /// The pause after `trigger_update` does not guarantee the page finished
    /// its computation; an empty read is emitted as is and counted as stale.
    pub async fn run_with<W: Write>(&self, out: &mut W) -> Result<Vec<TestCase>, String> {
        let started = Instant::now();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let samples = generate_batch(&mut rng, &self.ranges);
        info!(
            "generated {} samples from {} ranges",
            samples.len(),
            self.ranges.len()
        );

        if self.header {
            let seed = self
                .seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "random".to_string());
            writeln!(
                out,
                "// generated {} seed={}",
                chrono::Local::now().to_rfc3339(),
                seed
            )
            .map_err(|e| format!("failed to write header: {}", e))?;
        }

        let mut cases = Vec::with_capacity(samples.len());
        for ether in samples {
            if !self.running.load(Ordering::SeqCst) {
                warn!("interrupted, {} cases emitted", cases.len());
                break;
            }

            let case = self.convert(ether.to_string()).await?;
            writeln!(out, "{}", case.line(self.format))
                .map_err(|e| format!("failed to write case: {}", e))?;
            self.stat.inc_emitted(1);
            cases.push(case);
        }

        out.flush()
            .map_err(|e| format!("failed to flush output: {}", e))?;
        info!("{}", self.stat.summary(started.elapsed()));
        Ok(cases)
    }

    async fn convert(&self, ether: String) -> Result<TestCase, String> {
        self.page
            .set_input(&ether)
            .await
            .map_err(|e| format!("failed to set input {}: {}", ether, e))?;
        self.page
            .trigger_update()
            .await
            .map_err(|e| format!("failed to trigger update for {}: {}", ether, e))?;
        tokio::time::sleep(self.delay).await;
        let wei = self
            .page
            .read_output()
            .await
            .map_err(|e| format!("failed to read output for {}: {}", ether, e))?;

        if wei.is_empty() {
            warn!("empty output for {}, the page may not have settled", ether);
            self.stat.inc_stale(1);
        } else {
            debug!("{} ether = {} wei", ether, wei);
        }
        Ok(TestCase { wei, ether })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_RANGES;
    use crate::local::LocalPage;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Mutex;

    fn running() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(true))
    }

    fn runner<P: Page + Send + Sync>(page: P, format: OutputFormat) -> Runner<P> {
        Runner::new(
            page,
            &DEFAULT_RANGES,
            Duration::ZERO,
            format,
            Some(11),
            running(),
        )
    }

    /// Echoes the input back, but only after `settle_after` updates.
    struct MockPage {
        input: Mutex<String>,
        output: Mutex<String>,
        updates: AtomicUsize,
        settle_after: usize,
        fail_read: bool,
    }

    impl MockPage {
        fn new(settle_after: usize) -> Self {
            Self {
                input: Mutex::new(String::new()),
                output: Mutex::new(String::new()),
                updates: AtomicUsize::new(0),
                settle_after,
                fail_read: false,
            }
        }
    }

    #[async_trait]
    impl Page for MockPage {
        async fn set_input(&self, value: &str) -> Result<(), String> {
            *self.input.lock().await = value.to_string();
            Ok(())
        }

        async fn trigger_update(&self) -> Result<(), String> {
            let n = self.updates.fetch_add(1, Ordering::SeqCst) + 1;
            let mut output = self.output.lock().await;
            if n > self.settle_after {
                *output = format!("w{}", self.input.lock().await.as_str());
            } else {
                output.clear();
            }
            Ok(())
        }

        async fn read_output(&self) -> Result<String, String> {
            if self.fail_read {
                return Err("output element missing".to_string());
            }
            Ok(self.output.lock().await.clone())
        }
    }

    #[test]
    fn formats_lines() {
        let case = TestCase {
            wei: "500000000000000".to_string(),
            ether: "0.0005".to_string(),
        };
        assert_eq!(case.line(OutputFormat::Plain), "{500000000000000, 0.0005},");
        assert_eq!(
            case.line(OutputFormat::Quoted),
            "{\"500000000000000\", \"0.0005\"},"
        );
    }

    #[tokio::test]
    async fn emits_one_line_per_sample() {
        let runner = runner(MockPage::new(0), OutputFormat::Plain);
        let mut out = Vec::<u8>::new();
        let cases = runner.run_with(&mut out).await.unwrap();

        assert_eq!(cases.len(), 30);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 30);
        for (line, case) in lines.iter().zip(&cases) {
            assert_eq!(case.wei, format!("w{}", case.ether));
            assert_eq!(*line, format!("{{{}, {}}},", case.wei, case.ether));
        }
        assert_eq!(runner.stat().emitted(), 30);
        assert_eq!(runner.stat().stale(), 0);
    }

    #[tokio::test]
    async fn counts_empty_reads_as_stale() {
        let runner = runner(MockPage::new(3), OutputFormat::Quoted);
        let mut out = Vec::<u8>::new();
        let cases = runner.run_with(&mut out).await.unwrap();

        assert_eq!(cases.len(), 30);
        assert!(cases[..3].iter().all(|c| c.wei.is_empty()));
        assert!(cases[3..].iter().all(|c| !c.wei.is_empty()));
        assert_eq!(runner.stat().stale(), 3);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("{\"\", \""));
    }

    #[tokio::test]
    async fn page_error_aborts_the_run() {
        let mut page = MockPage::new(0);
        page.fail_read = true;
        let runner = runner(page, OutputFormat::Plain);
        let mut out = Vec::<u8>::new();
        let err = runner.run_with(&mut out).await.unwrap_err();

        assert!(err.contains("output element missing"), "{}", err);
        assert!(out.is_empty());
        assert_eq!(runner.stat().emitted(), 0);
    }

    #[tokio::test]
    async fn stops_when_interrupted() {
        let flag = Arc::new(AtomicBool::new(false));
        let runner = Runner::new(
            MockPage::new(0),
            &DEFAULT_RANGES,
            Duration::ZERO,
            OutputFormat::Plain,
            None,
            flag,
        );
        let mut out = Vec::<u8>::new();
        let cases = runner.run_with(&mut out).await.unwrap();
        assert!(cases.is_empty());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn runs_on_a_spawned_task() {
        fn assert_send<F: Send>(_: &F) {}

        let runner = Arc::new(runner(LocalPage::new(), OutputFormat::Plain));
        assert_send(&runner.run());

        let task = tokio::spawn({
            let runner = Arc::clone(&runner);
            async move {
                let mut out = Vec::<u8>::new();
                runner.run_with(&mut out).await.map(|cases| (cases, out))
            }
        });
        let (cases, out) = task.await.unwrap().unwrap();
        assert_eq!(cases.len(), 30);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 30);
        assert_eq!(runner.stat().emitted(), 30);
    }

    #[tokio::test]
    async fn same_seed_same_cases() {
        let a = runner(LocalPage::new(), OutputFormat::Plain)
            .run_with(&mut Vec::<u8>::new())
            .await
            .unwrap();
        let b = runner(LocalPage::new(), OutputFormat::Plain)
            .run_with(&mut Vec::<u8>::new())
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn local_page_yields_integer_wei() {
        let runner = runner(LocalPage::new(), OutputFormat::Plain).with_header(true);
        let mut out = Vec::<u8>::new();
        let cases = runner.run_with(&mut out).await.unwrap();

        assert_eq!(cases.len(), 30);
        for case in &cases {
            assert!(!case.wei.is_empty(), "no wei for {}", case.ether);
            assert!(case.wei.chars().all(|c| c.is_ascii_digit()), "{:?}", case);
        }
        let text = String::from_utf8(out).unwrap();
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("// generated "));
        assert!(first.ends_with(" seed=11"));
        assert_eq!(text.lines().count(), 31);
    }
}
