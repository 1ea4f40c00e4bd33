//! Response templates for the theory tutor.

use crate::simulator::{estimated_context_switches, MetricsSnapshot};

const CPU_HIGH_LOAD_PERCENT: f64 = 70.0;
const MEMORY_PRESSURE_PERCENT: f64 = 80.0;
const DISK_BUSY_MBPS: f64 = 150.0;
const TOP_PROCESSES: usize = 5;

pub const HELP: &str = "I can help you explore your (simulated) system and the operating-system \
concepts behind it. Try asking:
• \"What is my current CPU usage?\" or \"Explain what a CPU does\"
• \"Show current memory usage\" or \"Explain virtual memory\"
• \"List running processes\" or \"What is a process?\"
• \"How busy is my disk?\"
• \"What is my network bandwidth?\"
• \"How can I optimize performance?\"
• \"How does CPU scheduling work?\"
• \"Tell me about deadlock\"
• \"How does a file system work?\"";

pub fn cpu_status(snapshot: &MetricsSnapshot) -> String {
    let cpu = &snapshot.cpu;
    let load = if cpu.usage_percent > CPU_HIGH_LOAD_PERCENT {
        "This is a high load: many processes are competing for CPU time, so expect longer \
         run-queue waits and reduced responsiveness."
    } else {
        "There is comfortable headroom, so runnable processes are being dispatched promptly."
    };

    format!(
        "Your CPU is currently running at {:.1}% utilization across {} logical processors \
         clocked at {:.1} GHz. {} The scheduler is performing an estimated {} context switches \
         per second to share processor time between runnable processes.",
        cpu.usage_percent,
        cpu.core_count,
        cpu.frequency_ghz,
        load,
        estimated_context_switches(cpu.usage_percent)
    )
}

pub fn cpu_theory() -> String {
    "The CPU (Central Processing Unit) executes instructions through a repeating \
fetch-decode-execute cycle. Modern processors contain several cores, each able to run its own \
thread of execution, and often expose extra logical processors through simultaneous \
multithreading. The operating system's scheduler decides which thread runs on which core and \
for how long; switching between threads requires a context switch, in which the kernel saves \
the registers and program counter of the outgoing thread and restores those of the incoming \
one. CPU utilization is the fraction of time the cores spend executing work instead of idling."
        .to_string()
}

pub fn memory_status(snapshot: &MetricsSnapshot) -> String {
    let memory = &snapshot.memory;
    let percent = memory.percent_used();
    let pressure = if percent > MEMORY_PRESSURE_PERCENT {
        "Memory pressure is building; the kernel may soon start paging inactive pages out to \
         swap, which slows everything down."
    } else {
        "There is enough free memory for the kernel to keep working sets resident without \
         paging."
    };

    format!(
        "You are using {:.2} GB of {:.2} GB of RAM ({:.1}%), leaving {:.2} GB available. {}",
        memory.used_gb(),
        memory.total_gb(),
        percent,
        memory.available_gb(),
        pressure
    )
}

pub fn memory_theory() -> String {
    "Virtual memory is a memory management technique that gives every process the illusion of \
a large, private, contiguous address space. The address space is split into fixed-size pages \
that the memory management unit maps onto physical frames through per-process page tables, \
with a translation lookaside buffer (TLB) caching recent translations. When a process touches \
a page that is not resident, a page fault hands control to the kernel, which loads the page \
from disk and may evict another page using a replacement policy such as LRU or Clock. Paging \
isolates processes from one another and lets the system run workloads larger than physical RAM."
        .to_string()
}

pub fn process_list(snapshot: &MetricsSnapshot) -> String {
    if snapshot.processes.is_empty() {
        return "The process table is empty; no sample has been taken yet.".to_string();
    }

    let mut response = String::from("Here are the top processes by CPU usage right now:\n");
    for process in snapshot.processes.iter().take(TOP_PROCESSES) {
        response.push_str(&format!(
            "• {} (PID {}): {:.1}% CPU, {:.1} MB, {}\n",
            process.name, process.pid, process.cpu_percent, process.memory_mb, process.state
        ));
    }
    response.push_str(&format!(
        "{} processes are currently shown in the process table.",
        snapshot.processes.len()
    ));
    response
}

pub fn process_theory() -> String {
    "A process is a program in execution: its code together with an address space, open files, \
registers and at least one thread of control. The kernel tracks each one in a process control \
block (PCB) holding its PID, state, scheduling priority, memory mappings and saved CPU context. \
Processes move between the new, ready, running, waiting and terminated states as they are \
scheduled, block on I/O and finish. New processes are created by forking an existing one, and \
they communicate through inter-process communication mechanisms such as pipes, sockets, \
signals and shared memory."
        .to_string()
}

pub fn disk(snapshot: &MetricsSnapshot) -> String {
    let disk = &snapshot.disk;
    let activity = if disk.read_mbps + disk.write_mbps > DISK_BUSY_MBPS {
        "The disk is busy; requests are queuing in the I/O scheduler."
    } else {
        "I/O activity is moderate."
    };

    format!(
        "Disk I/O is currently reading at {:.1} MB/s and writing at {:.1} MB/s, and the volume \
         is {:.1}% full. {} The kernel buffers disk blocks in the page cache and orders pending \
         requests with an I/O scheduler to reduce seek time and merge adjacent operations.",
        disk.read_mbps, disk.write_mbps, disk.usage_percent, activity
    )
}

pub fn network(snapshot: &MetricsSnapshot) -> String {
    let network = &snapshot.network;
    format!(
        "Network activity: sending {:.0} KB/s and receiving {:.0} KB/s. Outgoing data travels \
         down the protocol stack from the socket layer through TCP/UDP and IP to the network \
         interface driver, while incoming packets raise interrupts that the kernel processes \
         before delivering the payload to the receiving socket's buffer.",
        network.sent_kbps, network.received_kbps
    )
}

pub fn optimization(snapshot: &MetricsSnapshot) -> String {
    let mut tips = Vec::new();

    if snapshot.cpu.usage_percent > CPU_HIGH_LOAD_PERCENT {
        tips.push(format!(
            "CPU usage is high at {:.1}%. Identify the heaviest processes and lower their \
             priority or close the ones you do not need.",
            snapshot.cpu.usage_percent
        ));
    }
    if snapshot.memory_percent() > MEMORY_PRESSURE_PERCENT {
        tips.push(format!(
            "Memory usage is at {:.1}%. Closing unused applications frees page frames and \
             avoids swapping.",
            snapshot.memory_percent()
        ));
    }
    if snapshot.disk.read_mbps + snapshot.disk.write_mbps > DISK_BUSY_MBPS {
        tips.push(
            "Disk throughput is high. Batching writes and relying on the page cache reduces \
             I/O wait."
                .to_string(),
        );
    }
    if tips.is_empty() {
        tips.push(
            "Your system is running within normal parameters. Keep background services to a \
             minimum and watch for processes that steadily grow their memory use."
                .to_string(),
        );
    }

    let mut response =
        String::from("Here are some suggestions based on your current system state:\n");
    for tip in tips {
        response.push_str("• ");
        response.push_str(&tip);
        response.push('\n');
    }
    response.truncate(response.trim_end().len());
    response
}

pub fn scheduling() -> String {
    "CPU scheduling decides which ready process runs next. Common algorithms include:
• First-Come, First-Served (FCFS): runs processes in arrival order; simple but suffers from the convoy effect.
• Shortest Job First (SJF): picks the shortest burst, minimising average waiting time but risking starvation.
• Round Robin (RR): gives each process a fixed time quantum in turn, which suits interactive systems.
• Priority Scheduling: runs the highest-priority process first, using aging to prevent starvation.
• Multilevel Feedback Queue (MLFQ): moves processes between queues based on their observed behaviour.
Linux uses the Completely Fair Scheduler (CFS), which tracks each task's virtual runtime in a red-black tree."
        .to_string()
}

pub fn deadlock() -> String {
    "A deadlock occurs when a set of processes are each waiting for a resource held by another \
member of the set, so none of them can proceed. Four conditions must hold simultaneously:
1. Mutual exclusion: at least one resource can be held by only one process at a time.
2. Hold and wait: a process holds resources while waiting to acquire more.
3. No preemption: resources cannot be forcibly taken from the process holding them.
4. Circular wait: a closed chain of processes exists in which each waits for the next.
Systems handle deadlock by prevention (breaking one of the conditions), avoidance (for example \
the Banker's algorithm), or detection and recovery."
        .to_string()
}

pub fn file_system() -> String {
    "A file system organises data on storage devices into files and directories. On Unix-like \
systems each file is described by an inode that records its size, ownership, permissions and \
the locations of its data blocks, while directories map names to inode numbers. Blocks can be \
allocated contiguously, as linked chains, or through indexed structures such as extents. \
Journaling file systems like ext4 write metadata changes to a log before applying them, so the \
disk can be brought back to a consistent state quickly after a crash."
        .to_string()
}
