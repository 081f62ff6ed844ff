mod render_trace;
