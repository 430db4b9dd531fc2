//! Background re-bake of overlay meshes for the live preview.
//!
//! The frame loop only submits jobs and drains finished results; the bake
//! itself runs on a worker thread. Queued jobs are coalesced so a held slider
//! key bakes at most one state behind the latest.

use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};
use gaia_bake::{BakeError, BakeOptions, BakedMesh, MeshBaker, SourceMesh};
use gaia_mask::TerrainField;

#[derive(Clone, Debug)]
pub struct BakeJob {
    pub rev: u64,
    pub meshes: Vec<SourceMesh>,
    pub field: TerrainField,
    pub options: BakeOptions,
}

#[derive(Debug)]
pub struct BakeOut {
    pub rev: u64,
    pub baked: Result<BakedMesh, BakeError>,
    pub t_bake_ms: u32,
}

fn process_job(job: BakeJob) -> BakeOut {
    let start = std::time::Instant::now();
    let baked = MeshBaker::new(job.options).bake(&job.meshes, &job.field);
    BakeOut {
        rev: job.rev,
        baked,
        t_bake_ms: start.elapsed().as_millis().min(u32::MAX as u128) as u32,
    }
}

pub struct RebakeWorker {
    job_tx: Sender<BakeJob>,
    res_rx: Receiver<BakeOut>,
    rev: u64,
}

impl RebakeWorker {
    /// Spawns the worker; it exits once the handle is dropped.
    pub fn new() -> Self {
        let (job_tx, job_rx) = unbounded::<BakeJob>();
        let (res_tx, res_rx) = unbounded::<BakeOut>();
        thread::spawn(move || {
            while let Ok(job) = job_rx.recv() {
                // Only the newest queued state is worth baking.
                let job = job_rx.try_iter().last().unwrap_or(job);
                if res_tx.send(process_job(job)).is_err() {
                    break;
                }
            }
        });
        Self {
            job_tx,
            res_rx,
            rev: 0,
        }
    }

    /// Queues a bake and returns its revision. Results of earlier
    /// submissions are discarded from now on.
    pub fn submit(&mut self, meshes: Vec<SourceMesh>, field: TerrainField, options: BakeOptions) -> u64 {
        self.rev += 1;
        let job = BakeJob {
            rev: self.rev,
            meshes,
            field,
            options,
        };
        if self.job_tx.send(job).is_err() {
            log::warn!("rebake worker is gone; job {} dropped", self.rev);
        }
        self.rev
    }

    /// Drops whatever is in flight without queueing new work.
    pub fn invalidate(&mut self) {
        self.rev += 1;
    }

    /// Newest finished result for the current revision, if it has arrived.
    pub fn drain_latest(&self) -> Option<BakeOut> {
        let out = self.res_rx.try_iter().filter(|o| o.rev == self.rev).last();
        if let Some(o) = &out {
            log::debug!("rebake {} finished in {} ms", o.rev, o.t_bake_ms);
        }
        out
    }
}

impl Default for RebakeWorker {
    fn default() -> Self {
        Self::new()
    }
}
