//! Parallel remeshing scheduler.
//!
//! One iteration decomposes the mesh into slab subdomains, runs the
//! default algorithm on each in its own rayon task, and merges the results
//! back. Worker completions flow over a channel drained by the scheduling
//! thread, so per-subdomain logging stays serialised there. The loop
//! continues while the monitor allows it and the previous iteration still
//! changed something.

use crossbeam_channel as channel;

use crate::attributes::AttributeStore;
use crate::domain::slab;
use crate::error::Result;
use crate::mesh::Mesh;
use crate::monitor::{CountMonitor, Monitor};
use crate::params::Parameters;

/// Completion message sent by a worker when its subdomain is done.
struct DomainCompletion {
  id: usize,
  operations_done: usize,
}

pub struct Scheduler {
  pub mesh: Mesh,
  pub attributes: AttributeStore,
  monitor: CountMonitor,
}

impl Scheduler {
  pub fn new(mesh: Mesh, attributes: AttributeStore) -> Self {
    Self {
      mesh,
      attributes,
      monitor: CountMonitor::new("scheduler"),
    }
  }

  /// Run scheduler iterations until the monitor halts or an iteration
  /// performs no operation. Returns the total number of operations.
  pub fn run(&mut self, parameters: &Parameters) -> Result<usize> {
    self.monitor.reset();
    self.monitor.init(parameters);

    if parameters.verbose()
      && parameters.max_iterations("scheduler") < 2
      && parameters.number_of_subdomains() > 1
    {
      tracing::warn!(
        "multithreaded setup with fewer than two scheduler iterations; cut vertices will not relax"
      );
    }

    let mut total_operations = 0;
    let mut iteration = 0usize;

    loop {
      let mut domains =
        slab::create_subdomains(parameters, &self.mesh, &self.attributes, iteration)?;

      let (sender, receiver) = channel::unbounded::<DomainCompletion>();

      rayon::scope(|scope| {
        for domain in domains.iter_mut() {
          let sender = sender.clone();
          scope.spawn(move |_| {
            let operations_done = domain.run();
            let _ = sender.send(DomainCompletion {
              id: domain.id,
              operations_done,
            });
          });
        }
      });
      drop(sender);

      // The scope is the join boundary; completions are drained here so
      // per-subdomain logging happens on the scheduling thread only.
      for completion in receiver.try_iter() {
        if parameters.verbose() && !parameters.silent_threads() {
          tracing::debug!(
            subdomain = completion.id,
            operations_done = completion.operations_done,
            "subdomain finished"
          );
        }
      }

      let operations_done =
        slab::merge_subdomains(domains, parameters, &mut self.mesh, &mut self.attributes)?;
      total_operations += operations_done;

      self.monitor.update();
      iteration += 1;
      if !(self.monitor.next() && operations_done > 0) {
        break;
      }
    }

    // Work pinned on cut vertices cannot run inside any slab, and a hub
    // vertex can sit on a cut in every decomposition. One serial pass
    // finishes it, so a decomposed run matches a single-subdomain run.
    if parameters.number_of_subdomains() > 1 {
      let mut serial = parameters.clone();
      serial.set_number_of_subdomains(1);

      let mut domains = slab::create_subdomains(&serial, &self.mesh, &self.attributes, 0)?;
      for domain in domains.iter_mut() {
        domain.run();
      }
      total_operations +=
        slab::merge_subdomains(domains, &serial, &mut self.mesh, &mut self.attributes)?;
    }

    Ok(total_operations)
  }
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod scheduler_test;
