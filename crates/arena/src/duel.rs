use super::ActionFrame;
use super::Outcome;
use super::Protocol;
use super::ServerMessage;
use super::SideHandle;
use super::TimerConfig;
use super::TurnChoice;
use super::move_menu;
use super::snapshot;
use bd_catalog::MoveData;
use bd_core::ID;
use bd_core::TurnNumber;
use bd_core::Unique;
use bd_engine::Squad;
use bd_engine::resolve_turn;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Receiver;
use tokio::sync::oneshot;
use tokio::time::timeout;

/// One participant's side of a duel: the squad it fields and the channel
/// endpoints the coordinator drives it through.
pub struct Side {
    handle: SideHandle,
    actions: Receiver<String>,
    squad: Squad,
}

impl Side {
    pub fn new(handle: SideHandle, actions: Receiver<String>, squad: Squad) -> Self {
        Self {
            handle,
            actions,
            squad,
        }
    }
    pub fn username(&self) -> &str {
        &self.handle.username
    }
}

/// Coordinator for a single duel.
///
/// Runs as one task owning both squads exclusively; all cross-side
/// interleaving resolves here. Each loop iteration is one turn: request both
/// actions, collect them under the action deadline, validate, apply
/// substitutions, resolve combat, and broadcast the result. The duel ends
/// when a squad falls, a side goes silent, or a connection drops.
pub struct Duel {
    id: ID<Duel>,
    timers: TimerConfig,
    rng: SmallRng,
    turn: TurnNumber,
    sides: [Side; 2],
}

impl Duel {
    pub fn new(sides: [Side; 2], timers: TimerConfig) -> Self {
        Self {
            id: ID::default(),
            timers,
            rng: SmallRng::from_os_rng(),
            turn: 1,
            sides,
        }
    }

    /// Replaces the RNG; used by tests to pin chance outcomes.
    pub fn with_rng(mut self, rng: SmallRng) -> Self {
        self.rng = rng;
        self
    }

    /// Runs the duel to completion, then fires the done signal so the lobby
    /// can clean up on every exit path.
    pub async fn run(mut self, done: oneshot::Sender<()>) {
        log::info!(
            "[duel {}] {} vs {}",
            self.id,
            self.sides[0].username(),
            self.sides[1].username()
        );
        self.play().await;
        log::info!("[duel {}] over", self.id);
        let _ = done.send(());
    }

    async fn play(&mut self) {
        loop {
            for i in 0..2 {
                if !self.sides[i].handle.is_connected() {
                    return self.drop_duel(i, None);
                }
            }
            if let Some(outcomes) = self.outcomes() {
                return self.finish(outcomes);
            }
            self.request_actions();
            let frames = match self.collect_actions().await {
                Ok(frames) => frames,
                Err(silent) => {
                    return self.drop_duel(silent, Some("no action before the deadline".to_string()));
                }
            };
            let events = self.apply_turn(frames);
            self.broadcast_result(events);
            self.turn += 1;
        }
    }

    /// True when this side's only legal action is a substitution.
    fn forced(&self, index: usize) -> bool {
        self.sides[index].squad.active().fainted()
    }

    fn request_actions(&self) {
        for side in &self.sides {
            let force_switch = side.squad.active().fainted();
            let menu = match force_switch {
                true => Vec::new(),
                false => move_menu(side.squad.active()),
            };
            side.handle.send(ServerMessage::TurnRequest {
                turn: self.turn,
                available_moves_info: menu,
                force_switch,
            });
            if force_switch {
                side.handle.send(ServerMessage::switch_request(format!(
                    "{} fainted",
                    side.squad.active().name()
                )));
            }
        }
        log::debug!("[duel {}] turn {}: requests sent", self.id, self.turn);
    }

    /// Awaits one action frame per side, each under its own deadline.
    /// Both collectors run concurrently and both are joined before the turn
    /// proceeds, so no receiver is left orphaned on a timeout.
    async fn collect_actions(&mut self) -> Result<[ActionFrame; 2], usize> {
        let limit = self.timers.action;
        let [a, b] = &mut self.sides;
        let (fa, fb) = tokio::join!(collect(a, limit), collect(b, limit));
        match (fa, fb) {
            (Some(fa), Some(fb)) => Ok([fa, fb]),
            (None, _) => Err(0),
            (_, None) => Err(1),
        }
    }

    /// Validates both frames, applies substitutions, resolves combat, and
    /// returns the assembled event log for the turn.
    fn apply_turn(&mut self, frames: [ActionFrame; 2]) -> Vec<String> {
        let mut events = Vec::new();
        let mut moves: [Option<Arc<MoveData>>; 2] = [None, None];
        for i in 0..2 {
            let side = &self.sides[i];
            let choice =
                Protocol::validate(&frames[i], &side.squad, self.forced(i), side.username());
            match choice {
                TurnChoice::Move(slot) => {
                    moves[i] = Some(self.sides[i].squad.active().moves()[slot].clone());
                }
                TurnChoice::Switch(target) => {
                    let side = &mut self.sides[i];
                    match side.squad.switch_to(target) {
                        Ok(()) => events.push(format!(
                            "{} sent out {}!",
                            side.handle.username,
                            side.squad.active().name()
                        )),
                        Err(e) => events.push(format!(
                            "{} tried to switch but {}!",
                            side.handle.username, e
                        )),
                    }
                }
                TurnChoice::Forfeit(line) => {
                    log::debug!("[duel {}] {}", self.id, line);
                    events.push(line);
                }
            }
        }
        let [a, b] = &mut self.sides;
        let (ma, mb) = (moves[0].take(), moves[1].take());
        let active_a = a.squad.active_mut();
        let active_b = b.squad.active_mut();
        events.extend(resolve_turn(
            active_a,
            ma.as_deref(),
            active_b,
            mb.as_deref(),
            false,
            &mut self.rng,
        ));
        events
    }

    fn broadcast_result(&self, description: Vec<String>) {
        let states = [snapshot(&self.sides[0].squad), snapshot(&self.sides[1].squad)];
        let actives = [
            self.sides[0].squad.active_index(),
            self.sides[1].squad.active_index(),
        ];
        for i in 0..2 {
            let o = 1 - i;
            self.sides[i].handle.send(ServerMessage::TurnResult {
                description: description.clone(),
                your_squad_state: states[i].clone(),
                opponent_squad_state: states[o].clone(),
                your_active_index: actives[i],
                opponent_active_index: actives[o],
            });
        }
        log::debug!("[duel {}] turn {}: result sent", self.id, self.turn);
    }

    /// End-of-duel outcomes, present once either squad has fallen.
    fn outcomes(&self) -> Option<[Outcome; 2]> {
        let down = [
            self.sides[0].squad.all_fainted(),
            self.sides[1].squad.all_fainted(),
        ];
        match down {
            [true, true] => Some([Outcome::Draw, Outcome::Draw]),
            [true, false] => Some([Outcome::Lose, Outcome::Win]),
            [false, true] => Some([Outcome::Win, Outcome::Lose]),
            [false, false] => None,
        }
    }

    /// Sends `game_end` to each still-connected side. Sessions return to
    /// lobby routing; connections stay open.
    fn finish(&self, outcomes: [Outcome; 2]) {
        for i in 0..2 {
            let o = 1 - i;
            log::info!(
                "[duel {}] {}: {}",
                self.id,
                self.sides[i].username(),
                outcomes[i]
            );
            self.sides[i].handle.send(ServerMessage::game_end(
                outcomes[i],
                self.sides[o].username(),
            ));
        }
    }

    /// A side went silent or dropped: notify the survivor and close both
    /// connections.
    fn drop_duel(&self, dead: usize, reason: Option<String>) {
        let alive = 1 - dead;
        log::info!(
            "[duel {}] {} disconnected, notifying {}",
            self.id,
            self.sides[dead].username(),
            self.sides[alive].username()
        );
        self.sides[alive].handle.send(ServerMessage::opponent_disconnected(
            self.sides[dead].username(),
            reason,
        ));
        self.sides[0].handle.close();
        self.sides[1].handle.close();
    }
}

impl Unique for Duel {
    fn id(&self) -> ID<Duel> {
        self.id
    }
}

/// Awaits one raw frame from a side and parses it. `None` covers timeout,
/// closed channel, and malformed frames alike; all three end the duel.
async fn collect(side: &mut Side, limit: Duration) -> Option<ActionFrame> {
    match timeout(limit, side.actions.recv()).await {
        Ok(Some(raw)) => match ActionFrame::try_from(raw.as_str()) {
            Ok(frame) => {
                log::debug!("[duel] {} chose {}", side.handle.username, frame);
                Some(frame)
            }
            Err(e) => {
                log::warn!("[duel] malformed action from {}: {}", side.handle.username, e);
                None
            }
        },
        Ok(None) => {
            log::info!("[duel] action channel closed for {}", side.handle.username);
            None
        }
        Err(_) => {
            log::info!("[duel] action deadline passed for {}", side.handle.username);
            None
        }
    }
}
