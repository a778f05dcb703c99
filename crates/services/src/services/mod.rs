pub mod task_move;
