// Copyright 2025 eraflo
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

//! Defines the BindingAgent, which prepares pipeline bindings for batches of objects.

use super::environment::GraphicsEnvironment;
use super::error::PipelineBindingError;
use super::pipeline::{PipelineBindings, PipelineShaders};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread;
use strata_core::renderer::ResourceBindingRegistry;

/// What an object needs resolved before it can be drawn.
#[derive(Clone)]
pub struct ObjectBindingRequest<K> {
    /// Identifies the object to the caller.
    pub key: K,
    /// A diagnostic label for the object's pipeline.
    pub label: String,
    /// The shaders of the object's pipeline.
    pub shaders: PipelineShaders,
    /// The object's own registry.
    pub registry: Arc<dyn ResourceBindingRegistry>,
}

impl<K> ObjectBindingRequest<K> {
    /// Creates a request.
    pub fn new(
        key: K,
        label: impl Into<String>,
        shaders: PipelineShaders,
        registry: Arc<dyn ResourceBindingRegistry>,
    ) -> Self {
        Self {
            key,
            label: label.into(),
            shaders,
            registry,
        }
    }
}

/// An object whose pipeline bindings were built.
#[derive(Debug, Clone)]
pub struct PreparedObject<K> {
    /// The key from the request.
    pub key: K,
    /// The object's pipeline bindings.
    pub bindings: PipelineBindings,
}

/// The outcome of one batch.
#[derive(Debug, Clone)]
pub struct PreparationReport<K> {
    /// Objects ready to draw, in request order.
    pub prepared: Vec<PreparedObject<K>>,
    /// Keys of the objects dropped from this batch, in request order.
    pub dropped: Vec<K>,
}

impl<K> Default for PreparationReport<K> {
    fn default() -> Self {
        Self {
            prepared: Vec::new(),
            dropped: Vec::new(),
        }
    }
}

/// The agent responsible for building pipeline bindings against one environment.
///
/// Objects are independent of each other, so a batch is spread over a small pool of
/// scoped worker threads. An object whose bindings cannot be built is logged and left
/// out of the batch; the rest of the batch is unaffected.
#[derive(Debug, Clone)]
pub struct BindingAgent {
    environment: Arc<GraphicsEnvironment>,
}

type Job<K> = (usize, ObjectBindingRequest<K>);
type JobResult<K> = (usize, K, Result<PipelineBindings, PipelineBindingError>);

impl BindingAgent {
    /// Creates an agent resolving against `environment`.
    pub fn new(environment: Arc<GraphicsEnvironment>) -> Self {
        Self { environment }
    }

    /// Returns the environment.
    pub fn environment(&self) -> &Arc<GraphicsEnvironment> {
        &self.environment
    }

    /// Builds the bindings of a single object on the calling thread.
    pub fn prepare_object<K>(
        &self,
        request: &ObjectBindingRequest<K>,
    ) -> Result<PipelineBindings, PipelineBindingError> {
        self.environment.build_pipeline_bindings(
            &request.label,
            &request.shaders,
            request.registry.as_ref(),
        )
    }

    /// Builds the bindings of every object in `requests`.
    ///
    /// Work is distributed over at most `max_worker_threads` threads; a batch of one
    /// runs on the calling thread.
    pub fn prepare_objects<K: Send>(
        &self,
        requests: Vec<ObjectBindingRequest<K>>,
    ) -> PreparationReport<K> {
        let count = requests.len();
        let workers = self.environment.settings().worker_threads().min(count);

        let mut results: Vec<JobResult<K>> = if workers <= 1 {
            requests
                .into_iter()
                .enumerate()
                .map(|(index, request)| {
                    let result = self.prepare_object(&request);
                    (index, request.key, result)
                })
                .collect()
        } else {
            self.run_workers(requests, workers)
        };
        results.sort_by_key(|(index, _, _)| *index);

        let mut report = PreparationReport::default();
        for (_, key, result) in results {
            match result {
                Ok(bindings) => report.prepared.push(PreparedObject { key, bindings }),
                Err(err) => {
                    log::warn!("Dropping object from this batch: {err}");
                    report.dropped.push(key);
                }
            }
        }

        log::debug!(
            "{}: prepared {} of {} object(s)",
            self.environment.label(),
            report.prepared.len(),
            count
        );
        report
    }

    fn run_workers<K: Send>(
        &self,
        requests: Vec<ObjectBindingRequest<K>>,
        workers: usize,
    ) -> Vec<JobResult<K>> {
        let (job_tx, job_rx): (Sender<Job<K>>, Receiver<Job<K>>) = crossbeam_channel::unbounded();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<JobResult<K>>();

        for job in requests.into_iter().enumerate() {
            // The receiver is alive until the end of this function.
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for (index, request) in job_rx.iter() {
                        let result = self.prepare_object(&request);
                        if result_tx.send((index, request.key, result)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(result_tx);

        result_rx.iter().collect()
    }
}
